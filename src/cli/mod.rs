pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "temblor")]
#[command(about = "Terminal earthquake monitor with local alerts", long_about = None)]
pub struct Cli {
    /// Suppress the audible alarm (notifications are still raised)
    #[arg(long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the TUI monitor (the default)
    Watch,
    /// Run a single fetch-and-evaluate pass and print the results
    Poll {
        /// Data source to poll (USGS, Kandilli, EMSC); defaults to the
        /// configured source
        #[arg(short, long)]
        source: Option<String>,
    },
    /// List the available data sources and their endpoints
    Sources,
    /// Exercise the alarm sink: sound, vibration, notification
    TestAlarm,
}
