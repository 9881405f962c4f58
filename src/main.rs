// Copyright (C) 2025 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{crate_version, Parser, Subcommand};

use tmix::config;
use tmix::midi;
use tmix::params::Registry;
use tmix::patch::{self, PatchStore};

const SYSTEMD_SERVICE: &str = r#"
[Unit]
Description=tmix synthesizer

[Service]
Type=simple
Restart=on-failure
EnvironmentFile=-/etc/default/tmix
ExecStart=/usr/local/bin/tmix start "$TMIX_CONFIG"
ExecReload=/bin/kill -HUP $MAINPID

[Install]
WantedBy=multi-user.target
Alias=tmix.service
"#;

#[derive(Parser)]
#[clap(
    author = "Michael Wilson",
    version = crate_version!(),
    about = "A polyphonic synthesizer driven by a grid controller."
)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start will start the synthesizer.
    Start {
        /// The path to the synthesizer config.
        config_path: String,
    },
    /// Lists the available MIDI input/output devices.
    MidiDevices {},
    /// Prints a markdown chart of the external MIDI control changes.
    CcChart {},
    /// Lists the stored patches.
    Patches {
        /// The patch storage root.
        patch_directory: String,
    },
    /// Prints a stored patch as YAML.
    Patch {
        /// The patch storage root.
        patch_directory: String,
        /// The patch slot, 0-63.
        number: u8,
    },
    /// Copies every stored patch from one storage root to another.
    CopyPatches {
        /// The patch storage root to copy from.
        from: String,
        /// The patch storage root to copy to.
        to: String,
    },
    /// Prints a systemd service definition to stdout.
    Systemd {},
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Start { config_path } => {
            config::init_controller(&PathBuf::from(config_path))?
                .join()
                .await?;
        }
        Commands::MidiDevices {} => {
            let devices = midi::list_devices()?;

            if devices.is_empty() {
                println!("No devices found.");
                return Ok(());
            }

            println!("Devices:");
            for device in devices {
                println!("- {}", device);
            }
        }
        Commands::CcChart {} => {
            print!("{}", Registry::standard()?.cc_chart());
        }
        Commands::Patches { patch_directory } => {
            let store = open_store(&patch_directory)?;
            let patches = store.list();

            if patches.is_empty() {
                println!("No patches found in {}.", patch_directory);
                return Ok(());
            }

            println!("Patches (count: {}):", patches.len());
            for (number, name) in patches {
                let (digit1, digit2) = patch::number_to_digits(number);
                println!("- {}{} ~{}: {}", digit1, digit2, u16::from(number) + 1, name);
            }
        }
        Commands::Patch {
            patch_directory,
            number,
        } => {
            let registry = Arc::new(Registry::standard()?);
            let store = PatchStore::open(&PathBuf::from(patch_directory), registry.clone())?;
            let patch = store.try_load(number)?;
            print!("{}", serde_yml::to_string(&patch.summary(number, &registry))?);
        }
        Commands::CopyPatches { from, to } => {
            let copied = PatchStore::copy_all(&open_store(&from)?, &open_store(&to)?)?;
            println!("Copied {} patches from {} to {}.", copied, from, to);
        }
        Commands::Systemd {} => {
            println!("{}", SYSTEMD_SERVICE)
        }
    }

    Ok(())
}

fn open_store(patch_directory: &str) -> Result<PatchStore, Box<dyn Error>> {
    Ok(PatchStore::open(
        &PathBuf::from(patch_directory),
        Arc::new(Registry::standard()?),
    )?)
}
