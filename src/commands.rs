//! Non-TUI subcommands: the three API operations as one-shot text output.

use anyhow::Result;
use clap::Subcommand;

use crate::api::client::{ApiClient, WebhookApi};
use crate::filter;

#[derive(Subcommand, Debug)]
pub enum ApiCommands {
    /// Launch the interactive dashboard
    #[command(name = "dashboard", alias = "tui")]
    Dashboard,

    /// List topics with their event counts
    #[command(name = "topics")]
    Topics,

    /// Print one page of a topic's events
    #[command(name = "events")]
    Events {
        /// Topic to show (defaults to the first one the server lists)
        #[arg(short, long)]
        topic: Option<String>,

        /// Page size
        #[arg(short, long, default_value = "100")]
        limit: u64,

        /// Page offset
        #[arg(short, long, default_value = "0")]
        offset: u64,

        /// Client-side text filter (same matching as the dashboard)
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Trigger preview generation for a resource
    #[command(name = "preview")]
    Preview {
        /// Resource identifier, e.g. /items/MLA123
        resource: String,
    },
}

pub async fn handle_command(cmd: ApiCommands, api_url: &str) -> Result<()> {
    let client = ApiClient::new(api_url.to_string(), 30)?;

    match cmd {
        // The dashboard is dispatched in main; never reaches here.
        ApiCommands::Dashboard => unreachable!("dashboard is handled by the TUI entry point"),

        ApiCommands::Topics => {
            let topics = client.topics().await?;

            if topics.is_empty() {
                println!("No topics.");
                return Ok(());
            }

            println!("Topics ({}):", topics.len());
            println!("{}", "─".repeat(48));
            println!("{:<36} {:>10}", "Topic", "Events");
            println!("{}", "─".repeat(48));
            for topic in &topics {
                println!("{:<36} {:>10}", topic.topic, topic.count);
            }
            println!("{}", "─".repeat(48));
        }

        ApiCommands::Events {
            topic,
            limit,
            offset,
            filter,
        } => {
            let topic = match topic {
                Some(t) => t,
                None => match client.topics().await?.into_iter().next() {
                    Some(first) => first.topic,
                    None => {
                        println!("No topics.");
                        return Ok(());
                    }
                },
            };

            let page = client.events(&topic, limit, offset).await?;
            let pagination = page.pagination_or(limit, offset);
            let filter_text = filter.unwrap_or_default();
            let visible = filter::apply_filter(&page.events, &filter_text);

            println!(
                "Topic {} — {} of {} events (offset {})",
                topic,
                visible.len(),
                pagination.total,
                pagination.offset
            );
            println!("{}", "─".repeat(100));
            println!(
                "{:<8} {:<12} {:<34} {:<20} {:<8}",
                "#", "User", "Resource", "Received", "Preview"
            );
            println!("{}", "─".repeat(100));

            for &idx in &visible {
                let event = &page.events[idx];
                let preview = match event.preview() {
                    Some(p) => match p.title.as_deref() {
                        Some(title) => format!("{} ({})", title, p.price_display()),
                        None => "-".to_string(),
                    },
                    None => "-".to_string(),
                };
                println!(
                    "{:<8} {:<12} {:<34} {:<20} {}",
                    pagination.offset + idx as u64 + 1,
                    event.user_display(),
                    event.resource_display(),
                    event.received_display(),
                    preview
                );
            }
            println!("{}", "─".repeat(100));
        }

        ApiCommands::Preview { resource } => {
            println!("Triggering preview for {}...", resource);
            client.trigger_preview(&resource).await?;
            println!("✅ Preview generation requested.");
        }
    }

    Ok(())
}
