//! Interactive menu for the viewer.
//!
//! Mirrors the side panel of the map UI: a year selector, a trigger that
//! redraws the map, and the static info panel. The map itself is an
//! in-process [`LayerStack`] printed after every render cycle.

use std::sync::Arc;

use dialoguer::{Confirm, Select};
use landcover_viewer::ViewerError;
use landcover_viewer::config::ViewerConfig;
use landcover_viewer::controller::{Controller, ControllerState, UiEvent};
use landcover_viewer_platform::canvas::LayerStack;
use landcover_viewer_platform::catalog::InMemoryCatalog;

/// Top-level actions in the viewer menu.
enum Action {
    SelectYear,
    ShowResult,
    ShowPanel,
    Quit,
}

impl Action {
    const ALL: &[Self] = &[
        Self::SelectYear,
        Self::ShowResult,
        Self::ShowPanel,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::SelectYear => "Select year",
            Self::ShowResult => "Show result",
            Self::ShowPanel => "Show info panel",
            Self::Quit => "Quit",
        }
    }
}

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Runs the interactive viewer until the user quits.
///
/// Draws the default year on start, then loops over the action menu.
/// Failed render cycles are reported and the loop continues. The prompts
/// block, so the loop runs on the blocking thread pool.
///
/// # Errors
///
/// Returns an error if the configuration is unusable or a prompt fails.
pub async fn run(config: ViewerConfig, catalog: Arc<InMemoryCatalog>) -> Result<(), BoxError> {
    tokio::task::spawn_blocking(move || menu_loop(&config, catalog)).await?
}

fn menu_loop(config: &ViewerConfig, catalog: Arc<InMemoryCatalog>) -> Result<(), BoxError> {
    let mut controller = Controller::from_config(config, catalog, LayerStack::new())?;

    println!("{}", config.panel.title);
    println!();
    report(controller.start(), &controller);

    let labels: Vec<&str> = Action::ALL
        .iter()
        .map(|action| match action {
            Action::ShowResult => config.panel.button.as_str(),
            other => other.label(),
        })
        .collect();

    loop {
        println!();
        let idx = Select::new()
            .with_prompt(format!(
                "Selected year: {} ({})",
                controller.selected_period(),
                config.panel.instruction
            ))
            .items(&labels)
            .default(0)
            .interact()?;

        match Action::ALL[idx] {
            Action::SelectYear => {
                let years = controller.store().supported().labels();
                let current = controller.selected_period().to_string();
                let default = years.iter().position(|y| *y == current).unwrap_or(0);

                let choice = Select::new()
                    .with_prompt(&config.panel.placeholder)
                    .items(&years)
                    .default(default)
                    .interact()?;

                if let Err(e) = controller.handle(UiEvent::SelectPeriod(years[choice].clone())) {
                    eprintln!("Error: {e}");
                }
            }
            Action::ShowResult => report(controller.handle(UiEvent::ShowResult), &controller),
            Action::ShowPanel => {
                for panel in controller.panel() {
                    println!();
                    print!("{panel}");
                }
            }
            Action::Quit => {
                if Confirm::new()
                    .with_prompt("Quit the viewer?")
                    .default(true)
                    .interact()?
                {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Prints the map and legend after a render cycle, or the error that
/// stopped it.
fn report(result: Result<ControllerState, ViewerError>, controller: &Controller<LayerStack>) {
    match result {
        Ok(_) => {
            print!("{}", controller.canvas());
            if let Some(legend) = controller.legend() {
                println!();
                print!("{legend}");
            }
            if let Some(status) = controller.status() {
                eprintln!("Note: {status}");
            }
        }
        Err(e) => eprintln!("Error: {e}"),
    }
}
