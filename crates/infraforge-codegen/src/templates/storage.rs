//! Object storage module

use infraforge_core::resources::StorageSettings;
use minijinja::{Value, context};

use super::{ENVIRONMENT, ModuleContract, PROJECT_NAME};

/// Template for the `storage` module
pub struct StorageTemplate;

impl StorageTemplate {
    /// Declared inputs and outputs
    pub const CONTRACT: ModuleContract = ModuleContract {
        inputs: &[PROJECT_NAME, ENVIRONMENT],
        outputs: &["bucket_name", "bucket_arn"],
    };

    /// Template context for the given settings
    pub fn context(settings: &StorageSettings) -> Value {
        context! {
            versioning => settings.versioning,
            encryption => settings.encryption,
        }
    }

    /// Template source
    pub const SOURCE: &'static str = r#"# Storage module: private bucket

variable "project_name" {
  description = "Project name used for resource naming"
  type        = string
}

variable "environment" {
  description = "Deployment environment"
  type        = string
}

locals {
  name = "${var.project_name}-${var.environment}"
}

data "aws_caller_identity" "current" {}

resource "aws_s3_bucket" "main" {
  bucket = "${local.name}-storage-${data.aws_caller_identity.current.account_id}"

  tags = {
    Name = "${local.name}-storage"
  }
}

resource "aws_s3_bucket_public_access_block" "main" {
  bucket = aws_s3_bucket.main.id

  block_public_acls       = true
  block_public_policy     = true
  ignore_public_acls      = true
  restrict_public_buckets = true
}
{% if versioning %}

resource "aws_s3_bucket_versioning" "main" {
  bucket = aws_s3_bucket.main.id

  versioning_configuration {
    status = "Enabled"
  }
}
{% endif %}
{% if encryption %}

resource "aws_s3_bucket_server_side_encryption_configuration" "main" {
  bucket = aws_s3_bucket.main.id

  rule {
    apply_server_side_encryption_by_default {
      sse_algorithm = "AES256"
    }
  }
}
{% endif %}

output "bucket_name" {
  description = "Bucket name"
  value       = aws_s3_bucket.main.id
}

output "bucket_arn" {
  description = "Bucket ARN"
  value       = aws_s3_bucket.main.arn
}
"#;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::ModuleSpec;
    use crate::templates::TemplateLibrary;
    use rstest::rstest;

    fn render(settings: StorageSettings) -> String {
        TemplateLibrary::new()
            .unwrap()
            .render(&ModuleSpec::Storage(settings))
            .unwrap()
            .text
    }

    #[rstest]
    #[case(true, true)]
    #[case(true, false)]
    #[case(false, true)]
    #[case(false, false)]
    fn test_optional_resources(#[case] versioning: bool, #[case] encryption: bool) {
        let text = render(StorageSettings {
            versioning,
            encryption,
        });
        assert_eq!(text.contains("aws_s3_bucket_versioning"), versioning);
        assert_eq!(
            text.contains("aws_s3_bucket_server_side_encryption_configuration"),
            encryption
        );
        assert!(text.contains("aws_s3_bucket_public_access_block"));
        assert!(!text.contains("\n\n\n"));
    }
}
