//! Compute tier module
//!
//! Both compute kinds render as an auto-scaling group behind a launch
//! template; a single instance is simply a group pinned to 1/1. The load
//! balancer inputs are optional so the module also stands alone.

use infraforge_core::resources::{ComputeSettings, ScalingMode};
use minijinja::{Value, context};

use super::{ENVIRONMENT, ModuleContract, ModuleInput, PROJECT_NAME};
use crate::ir::ModuleKind;

/// Template for the `compute` module
pub struct ComputeTemplate;

impl ComputeTemplate {
    /// Declared inputs and outputs
    pub const CONTRACT: ModuleContract = ModuleContract {
        inputs: &[
            PROJECT_NAME,
            ENVIRONMENT,
            ModuleInput::from_module("vpc_id", ModuleKind::Vpc, "vpc_id"),
            ModuleInput::from_module("private_subnet_ids", ModuleKind::Vpc, "private_subnet_ids"),
            ModuleInput::from_module("target_group_arn", ModuleKind::Alb, "target_group_arn")
                .optional(),
            ModuleInput::from_module("alb_security_group_id", ModuleKind::Alb, "alb_sg_id")
                .optional(),
        ],
        outputs: &["asg_name", "security_group_id"],
    };

    /// Template context for the given settings
    pub fn context(settings: &ComputeSettings) -> Value {
        context! {
            instance_type => &settings.instance_type,
            min_size => settings.min_size,
            max_size => settings.max_size,
            single => settings.scaling == ScalingMode::Single,
        }
    }

    /// Template source
    pub const SOURCE: &'static str = r#"# Compute module: {{ "single instance" if single else "auto-scaling group" }} ({{ instance_type | hcl }})

variable "project_name" {
  description = "Project name used for resource naming"
  type        = string
}

variable "environment" {
  description = "Deployment environment"
  type        = string
}

variable "vpc_id" {
  description = "VPC to place instances in"
  type        = string
}

variable "private_subnet_ids" {
  description = "Private subnets for instances"
  type        = list(string)
}

variable "target_group_arn" {
  description = "Load balancer target group to register with"
  type        = string
  default     = null
}

variable "alb_security_group_id" {
  description = "Load balancer security group allowed to reach instances"
  type        = string
  default     = null
}

locals {
  name = "${var.project_name}-${var.environment}"
}

data "aws_ami" "amazon_linux" {
  most_recent = true
  owners      = ["amazon"]

  filter {
    name   = "name"
    values = ["amzn2-ami-hvm-*-x86_64-gp2"]
  }
}

resource "aws_security_group" "app" {
  name_prefix = "${local.name}-app-"
  description = "Application instances"
  vpc_id      = var.vpc_id

  dynamic "ingress" {
    for_each = var.alb_security_group_id == null ? [] : [var.alb_security_group_id]

    content {
      description     = "HTTP from load balancer"
      from_port       = 80
      to_port         = 80
      protocol        = "tcp"
      security_groups = [ingress.value]
    }
  }

  egress {
    from_port   = 0
    to_port     = 0
    protocol    = "-1"
    cidr_blocks = ["0.0.0.0/0"]
  }

  tags = {
    Name = "${local.name}-app-sg"
  }

  lifecycle {
    create_before_destroy = true
  }
}

resource "aws_launch_template" "app" {
  name_prefix            = "${local.name}-app-"
  image_id               = data.aws_ami.amazon_linux.id
  instance_type          = "{{ instance_type | hcl }}"
  vpc_security_group_ids = [aws_security_group.app.id]

  metadata_options {
    http_endpoint = "enabled"
    http_tokens   = "required"
  }

  tag_specifications {
    resource_type = "instance"

    tags = {
      Name = "${local.name}-app"
    }
  }
}

resource "aws_autoscaling_group" "app" {
  name_prefix               = "${local.name}-app-"
  vpc_zone_identifier       = var.private_subnet_ids
  min_size                  = {{ min_size }}
  max_size                  = {{ max_size }}
  desired_capacity          = {{ min_size }}
  target_group_arns         = var.target_group_arn == null ? [] : [var.target_group_arn]
  health_check_type         = var.target_group_arn == null ? "EC2" : "ELB"
  health_check_grace_period = 300

  launch_template {
    id      = aws_launch_template.app.id
    version = "$Latest"
  }

  tag {
    key                 = "Name"
    value               = "${local.name}-app"
    propagate_at_launch = true
  }
}

output "asg_name" {
  description = "Auto-scaling group name"
  value       = aws_autoscaling_group.app.name
}

output "security_group_id" {
  description = "Security group attached to instances"
  value       = aws_security_group.app.id
}
"#;
}
