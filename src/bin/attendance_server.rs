//! Attendance API Server binary
//!
//! HTTP REST API for the university attendance export.

use attendance_export::api::{run_api_server, ApiConfig};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "attendance-server")]
#[command(version)]
#[command(about = "Attendance API Server - export class attendance as styled Excel workbooks")]
#[command(long_about = r#"
Attendance API Server

Endpoints:
  - GET /api/export?classId=<id>[&sectionId=<id>]&format=excel
                    - Download the attendance matrix (.xlsx)
  - GET /health     - Health check
  - GET /version    - Server version info
  - GET /           - API documentation

Features:
  - CORS enabled for cross-origin requests
  - Graceful shutdown on SIGINT/SIGTERM
  - Tracing and structured logging (RUST_LOG)

Example usage:
  attendance-server --data attendance.yaml
  attendance-server --host 0.0.0.0 --port 4000 --data attendance.yaml

  curl -o report.xlsx \
    "http://localhost:4000/api/export?classId=c1&format=excel"
"#)]
struct Args {
    /// Host address to bind to (use 0.0.0.0 for all interfaces)
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "ATTENDANCE_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "4000", env = "ATTENDANCE_PORT")]
    port: u16,

    /// Attendance dataset (YAML or JSON) served by the in-memory store
    #[arg(short, long, env = "ATTENDANCE_DATA")]
    data: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = ApiConfig {
        host: args.host,
        port: args.port,
        data_path: args.data,
    };

    run_api_server(config).await
}
