//! Boot-time user data for the workload instance.

/// Shell script the instance executes on first boot: update packages,
/// install Docker, write a static page naming the instance type, and serve
/// it with nginx on port 80. Pure function of the instance-type label;
/// nothing happens at generation time.
pub fn docker_nginx_user_data(instance_type: &str) -> String {
    format!(
        r#"#!/bin/bash
set -e

sudo yum update -y
sudo yum install git -y

sudo amazon-linux-extras install docker -y
sudo service docker start
sudo usermod -a -G docker ec2-user

cd /home/ec2-user/
mkdir html
cat << EOF >> /home/ec2-user/html/index.html
<html>
    <head>
        <title>Machine Type</title>
    </head>
    <body>
        <h1>Hi, this is instance type {instance_type} </h1>
    </body>
</html>
EOF

sudo chmod -R 755 /home/ec2-user/html/
sudo docker run -d -p 80:80 -v /home/ec2-user/html:/usr/share/nginx/html nginx:alpine
"#
    )
}
