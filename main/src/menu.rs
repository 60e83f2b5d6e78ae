//! Line-oriented interactive menu. Each action runs to completion before the
//! next prompt; a failing action is reported and the loop continues.

use std::io::{self, BufRead, Write};

use anyhow::Result;

use crate::{
    commands::{print_stats, print_summary, print_versions, App, ProcessOptions},
    datasets::DatasetKind,
};

pub struct Menu<'a, R> {
    app: &'a App,
    input: R,
}

impl<'a, R: BufRead> Menu<'a, R> {
    pub fn new(app: &'a App, input: R) -> Self {
        Self { app, input }
    }

    /// Print `message` and read one trimmed line. `None` once input is exhausted.
    fn prompt(&mut self, message: &str) -> Result<Option<String>> {
        print!("{message}");
        io::stdout().flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    pub async fn run(&mut self) -> Result<()> {
        loop {
            println!("\n=== Information Retrieval System Menu ===");
            println!("1. Process and save a dataset");
            println!("2. Display stored versions");
            println!("3. Delete a specific stored version");
            println!("4. Delete all stored versions");
            println!("5. Exit");

            let Some(choice) = self.prompt("Enter your choice (1-5): ")? else {
                return Ok(());
            };

            let outcome = match choice.as_str() {
                "1" => self.process().await,
                "2" => self.display().await,
                "3" => self.delete_one().await,
                "4" => self.delete_all().await,
                "5" => {
                    println!("Exiting...");
                    return Ok(());
                }
                _ => {
                    println!("Invalid choice. Please enter a number between 1 and 5.");
                    Ok(())
                }
            };

            if let Err(err) = outcome {
                println!("Error: {err:#}");
            }
        }
    }

    async fn process(&mut self) -> Result<()> {
        println!("\nAvailable datasets:");
        for (position, kind) in DatasetKind::ALL.iter().enumerate() {
            println!("{}. {} ({})", position + 1, kind.id(), kind.label());
        }
        let Some(choice) =
            self.prompt("Enter dataset number (e.g., 1) or name (e.g., beir/quora/test): ")?
        else {
            return Ok(());
        };
        let kind = DatasetKind::from_choice(&choice)?;
        let Some(version_name) =
            self.prompt("Enter a version name for saving (blank for a timestamp): ")?
        else {
            return Ok(());
        };

        let options = ProcessOptions {
            version_name: Some(version_name).filter(|name| !name.is_empty()),
            ..ProcessOptions::default()
        };
        let summary = self.app.process_dataset(kind, &options).await?;
        print_summary(&summary);
        Ok(())
    }

    /// List versions and read a selection by number or name.
    async fn choose_version(&mut self, action: &str) -> Result<Option<String>> {
        let versions = self.app.list_versions().await?;
        if versions.is_empty() {
            println!("No stored versions found.");
            return Ok(None);
        }
        println!("\nStored versions:");
        print_versions(&versions);

        let message = format!("Enter version name to {action} (or number): ");
        let Some(choice) = self.prompt(&message)? else {
            return Ok(None);
        };
        match choice.parse::<usize>() {
            Ok(position) => match position.checked_sub(1).and_then(|index| versions.get(index)) {
                Some(version) => Ok(Some(version.clone())),
                None => {
                    println!("Invalid version number.");
                    Ok(None)
                }
            },
            Err(_) => Ok(Some(choice)),
        }
    }

    async fn display(&mut self) -> Result<()> {
        if let Some(version) = self.choose_version("display").await? {
            let stats = self
                .app
                .show_version(&version, self.app.config().sample_limit)
                .await?;
            print_stats(&stats);
        }
        Ok(())
    }

    async fn delete_one(&mut self) -> Result<()> {
        if let Some(version) = self.choose_version("delete").await? {
            println!("{}", self.app.delete_version(&version).await?);
        }
        Ok(())
    }

    async fn delete_all(&mut self) -> Result<()> {
        let confirm = self
            .prompt("Are you sure you want to delete ALL versions? (yes/no): ")?
            .unwrap_or_default();
        if confirm.eq_ignore_ascii_case("yes") {
            let count = self.app.delete_all_versions().await?;
            println!("Deleted {count} versions.");
        } else {
            println!("Deletion cancelled.");
        }
        Ok(())
    }
}
