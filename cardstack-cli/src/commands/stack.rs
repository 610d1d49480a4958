//! Viewer commands: show, swipe and select on a page's card stack.

use clap::Args;

use cardstack_core::viewer::CardStackPage;
use cardstack_core::{load_viewer, CardPlacement, CardSide, PageId};

use crate::client::{build_client, local_storage, ClientError};
use crate::config::Config;

/// Show a page's card stack
#[derive(Debug, Args)]
pub struct ShowCommand {}

/// Drag the card stack horizontally
#[derive(Debug, Args)]
pub struct SwipeCommand {
    /// Card showing before the first drag
    #[arg(long, default_value = "front")]
    from: CardSide,

    /// Horizontal distance of each drag (negative = left)
    #[arg(required = true, allow_negative_numbers = true)]
    dx: Vec<f64>,
}

/// Bring a card to the front
#[derive(Debug, Args)]
pub struct SelectCommand {
    /// Card to activate (front or back)
    side: CardSide,
}

impl ShowCommand {
    pub fn run(&self, config: &Config, page_id: PageId) -> Result<(), StackCommandError> {
        let page = load_page(config, page_id)?;
        print_page(&page);
        Ok(())
    }
}

impl SwipeCommand {
    pub fn run(&self, config: &Config, page_id: PageId) -> Result<(), StackCommandError> {
        let mut page = load_page(config, page_id)?;
        page.stack.go_to_card(self.from);

        for dx in &self.dx {
            let before = page.stack.current();
            page.stack.swipe(*dx);
            let after = page.stack.current();

            if before == after {
                println!("swipe {:+}: stays on {}", dx, after);
            } else {
                println!("swipe {:+}: {} -> {}", dx, before, after);
            }
        }
        println!();

        print_page(&page);
        Ok(())
    }
}

impl SelectCommand {
    pub fn run(&self, config: &Config, page_id: PageId) -> Result<(), StackCommandError> {
        let mut page = load_page(config, page_id)?;
        page.stack.go_to_card(self.side);
        print_page(&page);
        Ok(())
    }
}

/// Loads the page remotely, or from local storage alone if sync is not configured.
fn load_page(config: &Config, page_id: PageId) -> Result<CardStackPage, StackCommandError> {
    match build_client(config) {
        Ok(client) => {
            let rt = tokio::runtime::Runtime::new()
                .map_err(|e| StackCommandError::RuntimeError(e.to_string()))?;
            Ok(rt.block_on(load_viewer(&client, page_id)))
        }
        Err(ClientError::NotConfigured(setting)) => {
            tracing::warn!("Document store not configured ({}), showing local images", setting);
            Ok(CardStackPage::resolve(page_id, None, &local_storage(config)))
        }
    }
}

fn print_page(page: &CardStackPage) {
    let title = format!("Page {}", page.page_id);
    println!("{}", title);
    println!("{}\n", "=".repeat(title.chars().count()));

    let view = page.stack.view();
    for side in CardSide::ALL {
        let image = page.image(side);
        let marker = match view.placement(side) {
            CardPlacement::Active => "active",
            CardPlacement::Behind => "behind",
        };
        println!(
            "{:<6} {} ({}) [{}]",
            format!("{}:", capitalize(side.as_str())),
            image.src,
            image.source,
            marker
        );
    }
    println!(
        "{:<6} {}",
        "QR:",
        page.qr.as_deref().unwrap_or("(none)")
    );
    println!();

    let dots: Vec<&str> = view
        .indicators
        .iter()
        .map(|lit| if *lit { "●" } else { "○" })
        .collect();
    println!("{}", dots.join(" "));
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Errors from viewer commands
#[derive(Debug)]
pub enum StackCommandError {
    RuntimeError(String),
}

impl std::fmt::Display for StackCommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StackCommandError::RuntimeError(e) => write!(f, "Runtime error: {}", e),
        }
    }
}

impl std::error::Error for StackCommandError {}
