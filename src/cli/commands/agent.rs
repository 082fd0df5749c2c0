//! Agent CLI commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use crate::adapters::cache::AgentCache;
use crate::cli::output::{output, CommandOutput, ConsoleNotifier, TableFormatter};
use crate::domain::models::{
    Agent, AgentPatch, AgentQuery, AgentRecord, Config, CreateAgentRequest, SortDirection,
    SortField, DEFAULT_PAGE_SIZE,
};
use crate::domain::ports::NotificationSink;
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::platform::{PlatformClient, PlatformClientConfig};
use crate::services::{AgentCacheMutator, AgentService, TracingNotifier};

#[derive(Args, Debug)]
pub struct AgentArgs {
    #[command(subcommand)]
    pub command: AgentCommands,
}

#[derive(Subcommand, Debug)]
pub enum AgentCommands {
    /// List agents
    List {
        /// Case-insensitive filter on name, type and voice
        #[arg(short, long)]
        search: Option<String>,
        /// Sort column (name, type, voice, created, updated)
        #[arg(long, default_value = "created")]
        sort: SortField,
        /// Sort ascending
        #[arg(long, conflicts_with = "desc")]
        asc: bool,
        /// Sort descending
        #[arg(long)]
        desc: bool,
        /// Page number, starting at 1
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Rows per page
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: usize,
    },
    /// Show one agent's configuration
    Show {
        /// Agent ID
        id: String,
    },
    /// Create an agent from the "Simple Agent" template
    Create {
        /// Agent name
        #[arg(short, long)]
        name: Option<String>,
        /// Language code, e.g. en-US
        #[arg(short, long)]
        language: Option<String>,
        /// System prompt
        #[arg(short, long)]
        prompt: Option<String>,
        /// Greeting spoken when a call starts
        #[arg(short, long)]
        welcome: Option<String>,
    },
    /// Change selected fields of an agent
    Update {
        /// Agent ID
        id: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        language: Option<String>,
        #[arg(short, long)]
        prompt: Option<String>,
        #[arg(short, long)]
        welcome: Option<String>,
    },
    /// Delete an agent
    Delete {
        /// Agent ID
        id: String,
    },
}

#[derive(Debug, Serialize)]
pub struct AgentListOutput {
    pub agents: Vec<Agent>,
    pub total: usize,
    pub page: usize,
    pub total_pages: usize,
}

impl CommandOutput for AgentListOutput {
    fn to_human(&self) -> String {
        if self.total == 0 {
            return "No agents found.".to_string();
        }
        if self.agents.is_empty() {
            return format!(
                "Page {} is past the end ({} page(s), {} agent(s)).",
                self.page, self.total_pages, self.total
            );
        }

        format!(
            "{}\nPage {} of {} ({} agent(s))",
            TableFormatter::new().format_agents(&self.agents),
            self.page,
            self.total_pages,
            self.total
        )
    }
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct AgentDetailOutput {
    pub agent: AgentRecord,
}

impl CommandOutput for AgentDetailOutput {
    fn to_human(&self) -> String {
        TableFormatter::new().format_agent_detail(&self.agent)
    }
}

#[derive(Debug, Serialize)]
pub struct AgentActionOutput {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
}

impl CommandOutput for AgentActionOutput {
    fn to_human(&self) -> String {
        self.message.clone()
    }
}

fn connect(config: &Config) -> Result<AgentService<PlatformClient>> {
    ConfigLoader::require_token(config)?;
    let client = PlatformClient::new(PlatformClientConfig::from(&config.api))
        .context("Failed to create platform client")?;
    let cache = Arc::new(AgentCache::new(config.cache.stale_after()));
    Ok(AgentService::new(Arc::new(client), cache))
}

fn mutator(
    agents: AgentService<PlatformClient>,
    json_mode: bool,
) -> AgentCacheMutator<PlatformClient, Arc<dyn NotificationSink>> {
    let notifier: Arc<dyn NotificationSink> = if json_mode {
        Arc::new(TracingNotifier)
    } else {
        Arc::new(ConsoleNotifier::new())
    };
    AgentCacheMutator::new(agents, notifier)
}

/// Column default: text columns read A-Z, timestamps newest first.
const fn default_direction(field: SortField) -> SortDirection {
    match field {
        SortField::Created | SortField::Updated => SortDirection::Desc,
        SortField::Name | SortField::Type | SortField::Voice => SortDirection::Asc,
    }
}

fn build_patch(
    name: Option<String>,
    language: Option<String>,
    prompt: Option<String>,
    welcome: Option<String>,
) -> AgentPatch {
    let mut patch = AgentPatch {
        agent_name: name,
        language_code: language,
        welcome_message: welcome,
        ..AgentPatch::default()
    };
    if let Some(prompt) = prompt {
        patch = patch.with_system_prompt(prompt);
    }
    patch
}

pub async fn execute(args: AgentArgs, config: &Config, json_mode: bool) -> Result<()> {
    let agents = connect(config)?;

    match args.command {
        AgentCommands::List {
            search,
            sort,
            asc,
            desc,
            page,
            page_size,
        } => {
            let direction = match (asc, desc) {
                (true, _) => SortDirection::Asc,
                (_, true) => SortDirection::Desc,
                _ => default_direction(sort),
            };
            let mut query = AgentQuery::default()
                .with_sort(sort, direction)
                .with_page(page, page_size);
            if let Some(term) = search {
                query = query.with_search(term);
            }

            let result = agents.browse(&query).await?;
            let out = AgentListOutput {
                agents: result.items,
                total: result.total,
                page: result.page,
                total_pages: result.total_pages,
            };
            output(&out, json_mode);
        }

        AgentCommands::Show { id } => {
            let agent = agents.get(&id).await?;
            output(&AgentDetailOutput { agent }, json_mode);
        }

        AgentCommands::Create {
            name,
            language,
            prompt,
            welcome,
        } => {
            let mut payload = CreateAgentRequest::default();
            if let Some(name) = name {
                payload = payload.with_name(name);
            }
            if let Some(language) = language {
                payload = payload.with_language(language);
            }
            if let Some(prompt) = prompt {
                payload = payload.with_system_prompt(prompt);
            }
            if let Some(welcome) = welcome {
                payload = payload.with_welcome_message(welcome);
            }

            let created = mutator(agents, json_mode).create(payload).await?;
            let out = AgentActionOutput {
                success: true,
                message: format!("Created agent {}", created.ai_agent_id),
                agent_id: Some(created.ai_agent_id),
            };
            output(&out, json_mode);
        }

        AgentCommands::Update {
            id,
            name,
            language,
            prompt,
            welcome,
        } => {
            let patch = build_patch(name, language, prompt, welcome);
            // Warm the cache so the edit is applied optimistically.
            if let Err(err) = agents.get(&id).await {
                debug!(error = %err, "agent not cached before update");
            }
            mutator(agents, json_mode).update(&id, patch).await?;
            let out = AgentActionOutput {
                success: true,
                message: format!("Updated agent {id}"),
                agent_id: Some(id),
            };
            output(&out, json_mode);
        }

        AgentCommands::Delete { id } => {
            let confirmation = mutator(agents, json_mode).delete(&id).await?;
            let out = AgentActionOutput {
                success: true,
                message: if confirmation.message.is_empty() {
                    format!("Deleted agent {id}")
                } else {
                    confirmation.message
                },
                agent_id: Some(id),
            };
            output(&out, json_mode);
        }
    }

    Ok(())
}
