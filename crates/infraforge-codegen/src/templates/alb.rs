//! Application load balancer module

use minijinja::{Value, context};

use super::{ENVIRONMENT, ModuleContract, ModuleInput, PROJECT_NAME};
use crate::ir::ModuleKind;

/// Template for the `alb` module
pub struct AlbTemplate;

impl AlbTemplate {
    /// Declared inputs and outputs
    pub const CONTRACT: ModuleContract = ModuleContract {
        inputs: &[
            PROJECT_NAME,
            ENVIRONMENT,
            ModuleInput::from_module("vpc_id", ModuleKind::Vpc, "vpc_id"),
            ModuleInput::from_module("public_subnet_ids", ModuleKind::Vpc, "public_subnet_ids"),
        ],
        outputs: &["alb_dns_name", "alb_sg_id", "target_group_arn"],
    };

    /// The load balancer has no parameters beyond naming
    pub fn context() -> Value {
        context! {}
    }

    /// Template source
    pub const SOURCE: &'static str = r#"# ALB module: internet-facing load balancer for the compute tier

variable "project_name" {
  description = "Project name used for resource naming"
  type        = string
}

variable "environment" {
  description = "Deployment environment"
  type        = string
}

variable "vpc_id" {
  description = "VPC to place the load balancer in"
  type        = string
}

variable "public_subnet_ids" {
  description = "Public subnets for the load balancer"
  type        = list(string)
}

locals {
  name = "${var.project_name}-${var.environment}"
}

resource "aws_security_group" "alb" {
  name_prefix = "${local.name}-alb-"
  description = "Load balancer ingress"
  vpc_id      = var.vpc_id

  ingress {
    description = "HTTP"
    from_port   = 80
    to_port     = 80
    protocol    = "tcp"
    cidr_blocks = ["0.0.0.0/0"]
  }

  ingress {
    description = "HTTPS"
    from_port   = 443
    to_port     = 443
    protocol    = "tcp"
    cidr_blocks = ["0.0.0.0/0"]
  }

  egress {
    from_port   = 0
    to_port     = 0
    protocol    = "-1"
    cidr_blocks = ["0.0.0.0/0"]
  }

  tags = {
    Name = "${local.name}-alb-sg"
  }

  lifecycle {
    create_before_destroy = true
  }
}

resource "aws_lb" "main" {
  name               = "${local.name}-alb"
  internal           = false
  load_balancer_type = "application"
  security_groups    = [aws_security_group.alb.id]
  subnets            = var.public_subnet_ids

  enable_deletion_protection = var.environment == "production"

  tags = {
    Name = "${local.name}-alb"
  }
}

resource "aws_lb_target_group" "app" {
  name     = "${local.name}-tg"
  port     = 80
  protocol = "HTTP"
  vpc_id   = var.vpc_id

  health_check {
    enabled             = true
    path                = "/health"
    matcher             = "200"
    interval            = 30
    timeout             = 5
    healthy_threshold   = 2
    unhealthy_threshold = 3
  }

  tags = {
    Name = "${local.name}-tg"
  }
}

resource "aws_lb_listener" "http" {
  load_balancer_arn = aws_lb.main.arn
  port              = 80
  protocol          = "HTTP"

  default_action {
    type             = "forward"
    target_group_arn = aws_lb_target_group.app.arn
  }
}

output "alb_dns_name" {
  description = "Load balancer DNS name"
  value       = aws_lb.main.dns_name
}

output "alb_sg_id" {
  description = "Load balancer security group ID"
  value       = aws_security_group.alb.id
}

output "target_group_arn" {
  description = "Target group for the compute tier"
  value       = aws_lb_target_group.app.arn
}
"#;
}
