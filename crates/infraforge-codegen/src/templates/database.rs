//! Database tier module
//!
//! A managed relational instance in the private subnets. The master
//! password is generated and stored by the provider; nothing secret is ever
//! written into the bundle.

use infraforge_core::resources::DatabaseSettings;
use minijinja::{Value, context};

use super::{ENVIRONMENT, ModuleContract, ModuleInput, PROJECT_NAME};
use crate::ir::ModuleKind;

/// Template for the `database` module
pub struct DatabaseTemplate;

impl DatabaseTemplate {
    /// Declared inputs and outputs
    pub const CONTRACT: ModuleContract = ModuleContract {
        inputs: &[
            PROJECT_NAME,
            ENVIRONMENT,
            ModuleInput::from_module("vpc_id", ModuleKind::Vpc, "vpc_id"),
            ModuleInput::from_module("private_subnet_ids", ModuleKind::Vpc, "private_subnet_ids"),
            ModuleInput::from_module(
                "app_security_group_id",
                ModuleKind::Compute,
                "security_group_id",
            )
            .optional(),
        ],
        outputs: &["db_endpoint", "db_arn"],
    };

    /// Template context for the given settings
    pub fn context(settings: &DatabaseSettings) -> Value {
        context! {
            engine => &settings.engine,
            engine_version => settings.engine_version(),
            instance_class => &settings.instance_class,
            allocated_storage => settings.allocated_storage_gb,
            multi_az => settings.multi_az,
            port => settings.port(),
        }
    }

    /// Template source
    pub const SOURCE: &'static str = r#"# Database module: {{ engine | hcl }} {{ engine_version }} on {{ instance_class | hcl }}

variable "project_name" {
  description = "Project name used for resource naming"
  type        = string
}

variable "environment" {
  description = "Deployment environment"
  type        = string
}

variable "vpc_id" {
  description = "VPC to place the database in"
  type        = string
}

variable "private_subnet_ids" {
  description = "Private subnets for the database subnet group"
  type        = list(string)
}

variable "app_security_group_id" {
  description = "Application security group allowed to connect"
  type        = string
  default     = null
}

locals {
  name = "${var.project_name}-${var.environment}"
}

resource "aws_db_subnet_group" "main" {
  name       = "${local.name}-db"
  subnet_ids = var.private_subnet_ids

  tags = {
    Name = "${local.name}-db-subnets"
  }
}

resource "aws_security_group" "db" {
  name_prefix = "${local.name}-db-"
  description = "Database access"
  vpc_id      = var.vpc_id

  dynamic "ingress" {
    for_each = var.app_security_group_id == null ? [] : [var.app_security_group_id]

    content {
      description     = "Database from application"
      from_port       = {{ port }}
      to_port         = {{ port }}
      protocol        = "tcp"
      security_groups = [ingress.value]
    }
  }

  tags = {
    Name = "${local.name}-db-sg"
  }

  lifecycle {
    create_before_destroy = true
  }
}

resource "aws_db_instance" "main" {
  identifier     = "${local.name}-db"
  engine         = "{{ engine | hcl }}"
  engine_version = "{{ engine_version }}"
  instance_class = "{{ instance_class | hcl }}"

  allocated_storage = {{ allocated_storage }}
  storage_type      = "gp3"
  storage_encrypted = true

  db_name                     = "app"
  username                    = "dbadmin"
  manage_master_user_password = true
  port                        = {{ port }}

  db_subnet_group_name   = aws_db_subnet_group.main.name
  vpc_security_group_ids = [aws_security_group.db.id]
  multi_az               = {{ "true" if multi_az else "false" }}
  publicly_accessible    = false

  backup_retention_period   = 7
  deletion_protection       = var.environment == "production"
  skip_final_snapshot       = var.environment != "production"
  final_snapshot_identifier = "${local.name}-db-final"

  tags = {
    Name = "${local.name}-db"
  }
}

output "db_endpoint" {
  description = "Database connection endpoint"
  value       = aws_db_instance.main.endpoint
}

output "db_arn" {
  description = "Database ARN"
  value       = aws_db_instance.main.arn
}
"#;
}
