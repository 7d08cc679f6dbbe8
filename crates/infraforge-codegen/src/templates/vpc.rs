//! Network foundation module
//!
//! One VPC spread over `az_count` availability zones, each with a public and
//! a private subnet carved out of the VPC block with `cidrsubnet(cidr, 4, n)`.
//! Private subnets egress through a single NAT gateway.

use infraforge_core::resources::{SUBNET_NEWBITS, VpcSettings};
use minijinja::{Value, context};

use super::{ENVIRONMENT, ModuleContract, ModuleInput, PROJECT_NAME};

/// Template for the `vpc` module
pub struct VpcTemplate;

impl VpcTemplate {
    /// Declared inputs and outputs
    pub const CONTRACT: ModuleContract = ModuleContract {
        inputs: &[
            PROJECT_NAME,
            ENVIRONMENT,
            ModuleInput::variable("vpc_cidr"),
            ModuleInput::variable("az_count"),
        ],
        outputs: &[
            "vpc_id",
            "public_subnet_ids",
            "private_subnet_ids",
            "cidr_block",
        ],
    };

    /// Template context for the given settings
    pub fn context(settings: &VpcSettings) -> Value {
        context! {
            cidr => &settings.cidr,
            az_count => settings.az_count,
            subnet_newbits => SUBNET_NEWBITS,
        }
    }

    /// Template source
    pub const SOURCE: &'static str = r#"# VPC module: network foundation with public and private subnets

variable "project_name" {
  description = "Project name used for resource naming"
  type        = string
}

variable "environment" {
  description = "Deployment environment"
  type        = string
}

variable "vpc_cidr" {
  description = "CIDR block for the VPC"
  type        = string
  default     = "{{ cidr | hcl }}"
}

variable "az_count" {
  description = "Number of availability zones to span"
  type        = number
  default     = {{ az_count }}
}

locals {
  name = "${var.project_name}-${var.environment}"
}

data "aws_availability_zones" "available" {
  state = "available"
}

resource "aws_vpc" "main" {
  cidr_block           = var.vpc_cidr
  enable_dns_hostnames = true
  enable_dns_support   = true

  tags = {
    Name = "${local.name}-vpc"
  }
}

resource "aws_internet_gateway" "main" {
  vpc_id = aws_vpc.main.id

  tags = {
    Name = "${local.name}-igw"
  }
}

resource "aws_subnet" "public" {
  count                   = var.az_count
  vpc_id                  = aws_vpc.main.id
  cidr_block              = cidrsubnet(var.vpc_cidr, {{ subnet_newbits }}, count.index)
  availability_zone       = data.aws_availability_zones.available.names[count.index]
  map_public_ip_on_launch = true

  tags = {
    Name = "${local.name}-public-${count.index + 1}"
    Tier = "public"
  }
}

resource "aws_subnet" "private" {
  count             = var.az_count
  vpc_id            = aws_vpc.main.id
  cidr_block        = cidrsubnet(var.vpc_cidr, {{ subnet_newbits }}, count.index + var.az_count)
  availability_zone = data.aws_availability_zones.available.names[count.index]

  tags = {
    Name = "${local.name}-private-${count.index + 1}"
    Tier = "private"
  }
}

resource "aws_eip" "nat" {
  domain = "vpc"

  tags = {
    Name = "${local.name}-nat-eip"
  }

  depends_on = [aws_internet_gateway.main]
}

resource "aws_nat_gateway" "main" {
  allocation_id = aws_eip.nat.id
  subnet_id     = aws_subnet.public[0].id

  tags = {
    Name = "${local.name}-nat"
  }

  depends_on = [aws_internet_gateway.main]
}

resource "aws_route_table" "public" {
  vpc_id = aws_vpc.main.id

  route {
    cidr_block = "0.0.0.0/0"
    gateway_id = aws_internet_gateway.main.id
  }

  tags = {
    Name = "${local.name}-public-rt"
  }
}

resource "aws_route_table" "private" {
  vpc_id = aws_vpc.main.id

  route {
    cidr_block     = "0.0.0.0/0"
    nat_gateway_id = aws_nat_gateway.main.id
  }

  tags = {
    Name = "${local.name}-private-rt"
  }
}

resource "aws_route_table_association" "public" {
  count          = var.az_count
  subnet_id      = aws_subnet.public[count.index].id
  route_table_id = aws_route_table.public.id
}

resource "aws_route_table_association" "private" {
  count          = var.az_count
  subnet_id      = aws_subnet.private[count.index].id
  route_table_id = aws_route_table.private.id
}

output "vpc_id" {
  description = "VPC ID"
  value       = aws_vpc.main.id
}

output "public_subnet_ids" {
  description = "Public subnet IDs"
  value       = aws_subnet.public[*].id
}

output "private_subnet_ids" {
  description = "Private subnet IDs"
  value       = aws_subnet.private[*].id
}

output "cidr_block" {
  description = "VPC CIDR block"
  value       = aws_vpc.main.cidr_block
}
"#;
}
