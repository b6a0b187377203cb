// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `wardenctl`: the command-line client for the job supervisor (§6
//! CLI-visible contracts). Talks to the daemon over its control and event
//! Unix sockets; carries no state-machine logic of its own.

mod client;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use warden_core::job::JobName;
use warden_wire::{ErrorCode, Payload, Response};

/// Control a running `wardend` job supervisor.
#[derive(Debug, Parser)]
struct Cli {
    /// Path to the control socket.
    #[arg(long, default_value = "/var/run/wardend/control.sock")]
    control_socket: PathBuf,
    /// Path to the event socket (used by `listen`).
    #[arg(long, default_value = "/var/run/wardend/event.sock")]
    event_socket: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start a job.
    Start { job: String },
    /// Stop a job.
    Stop { job: String },
    /// Query a job's phase. Exit code: 0 running, positive stopped, negative on error.
    Status { job: String },
    /// List every configured job and its phase.
    ListJobs,
    /// Block until a job's next phase transition.
    Wait { job: String },
    /// Stream phase-change events as they occur.
    Listen,
    /// Gracefully shut down the supervisor.
    Terminate,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("wardenctl: {error}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.command {
        Command::Start { job } => simple_command(&cli.control_socket, warden_wire::Request::Start { job: validate(&job)? }).await,
        Command::Stop { job } => simple_command(&cli.control_socket, warden_wire::Request::Stop { job: validate(&job)? }).await,
        Command::Status { job } => status(&cli.control_socket, validate(&job)?).await,
        Command::ListJobs => list_jobs(&cli.control_socket).await,
        Command::Wait { job } => simple_command(&cli.control_socket, warden_wire::Request::Wait { job: validate(&job)? }).await,
        Command::Terminate => simple_command(&cli.control_socket, warden_wire::Request::Terminate).await,
        Command::Listen => listen(&cli.event_socket).await,
    }
}

fn validate(job: &str) -> anyhow::Result<String> {
    JobName::new(job.to_string())?;
    Ok(job.to_string())
}

async fn simple_command(
    socket: &std::path::Path,
    request: warden_wire::Request,
) -> anyhow::Result<ExitCode> {
    match client::send(socket, request).await? {
        Response::Ok(_) => Ok(ExitCode::SUCCESS),
        Response::Err(error) => {
            eprintln!("wardenctl: {}", describe(error));
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn status(socket: &std::path::Path, job: String) -> anyhow::Result<ExitCode> {
    match client::send(socket, warden_wire::Request::Status { job }).await? {
        Response::Ok(Some(Payload::Phase(phase))) if phase == "RUNNING" => {
            println!("RUNNING");
            Ok(ExitCode::SUCCESS)
        }
        Response::Ok(Some(Payload::Phase(phase))) => {
            println!("{phase}");
            Ok(ExitCode::from(1))
        }
        Response::Ok(_) => Ok(ExitCode::from(1)),
        Response::Err(error) => {
            eprintln!("wardenctl: {}", describe(error));
            std::process::exit(-1);
        }
    }
}

async fn list_jobs(socket: &std::path::Path) -> anyhow::Result<ExitCode> {
    match client::send(socket, warden_wire::Request::ListJobs).await? {
        Response::Ok(Some(Payload::Jobs(entries))) => {
            for entry in entries {
                println!("{} {}", entry.status, entry.name);
            }
            Ok(ExitCode::SUCCESS)
        }
        Response::Ok(_) => Ok(ExitCode::SUCCESS),
        Response::Err(error) => {
            eprintln!("wardenctl: {}", describe(error));
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn listen(event_socket: &std::path::Path) -> anyhow::Result<ExitCode> {
    let stream = tokio::net::UnixStream::connect(event_socket).await?;
    let mut reader = tokio::io::BufReader::new(stream);
    loop {
        match warden_wire::read_message(&mut reader).await? {
            Some(line) => {
                let event: warden_wire::EventMessage = warden_wire::decode(&line)?;
                println!("{} {}", event.status, event.job);
            }
            None => return Ok(ExitCode::SUCCESS),
        }
    }
}

fn describe(error: ErrorCode) -> &'static str {
    match error {
        ErrorCode::UnknownJob => "UNKNOWN_JOB",
        ErrorCode::AlreadyRunning => "ALREADY_RUNNING",
        ErrorCode::AlreadyStopped => "ALREADY_STOPPED",
        ErrorCode::SpawnFailed => "SPAWN_FAILED",
        ErrorCode::BadRequest => "BAD_REQUEST",
    }
}
