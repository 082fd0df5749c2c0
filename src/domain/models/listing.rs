//! Client-side filtering, sorting and pagination of agent rows.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::agent::Agent;

/// Column an agent table can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Name,
    Type,
    Voice,
    Created,
    Updated,
}

impl FromStr for SortField {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "type" => Ok(Self::Type),
            "voice" => Ok(Self::Voice),
            "created" | "created_at" => Ok(Self::Created),
            "updated" | "updated_at" => Ok(Self::Updated),
            _ => Err(anyhow::anyhow!(
                "Invalid sort field: {s}. Must be one of: name, type, voice, created, updated"
            )),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => write!(f, "name"),
            Self::Type => write!(f, "type"),
            Self::Voice => write!(f, "voice"),
            Self::Created => write!(f, "created"),
            Self::Updated => write!(f, "updated"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Search, sort and page over a set of agent rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentQuery {
    pub search: Option<String>,
    pub sort: Option<(SortField, SortDirection)>,
    /// 1-based
    pub page: usize,
    pub page_size: usize,
}

pub const DEFAULT_PAGE_SIZE: usize = 10;

impl Default for AgentQuery {
    fn default() -> Self {
        Self {
            search: None,
            sort: Some((SortField::Created, SortDirection::Desc)),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of query results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentPage {
    pub items: Vec<Agent>,
    /// Rows matching the search, across all pages
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

impl AgentQuery {
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub const fn with_sort(mut self, field: SortField, direction: SortDirection) -> Self {
        self.sort = Some((field, direction));
        self
    }

    pub const fn unsorted(mut self) -> Self {
        self.sort = None;
        self
    }

    pub const fn with_page(mut self, page: usize, page_size: usize) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }

    /// Header-click behavior: same column flips direction, a new column starts ascending.
    pub fn toggle_sort(&mut self, field: SortField) {
        self.sort = match self.sort {
            Some((current, direction)) if current == field => Some((field, direction.flipped())),
            _ => Some((field, SortDirection::Asc)),
        };
    }

    pub fn matches(&self, agent: &Agent) -> bool {
        let Some(term) = self.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) else {
            return true;
        };
        let term = term.to_lowercase();
        agent.name.to_lowercase().contains(&term)
            || agent.agent_type.to_lowercase().contains(&term)
            || agent.voice.to_lowercase().contains(&term)
    }

    /// Filter, sort (stable) and cut one page out of `rows`.
    pub fn apply(&self, rows: &[Agent]) -> AgentPage {
        let mut matched: Vec<Agent> = rows.iter().filter(|a| self.matches(a)).cloned().collect();

        if let Some((field, direction)) = self.sort {
            matched.sort_by(|a, b| {
                let ord = compare(a, b, field);
                match direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            });
        }

        let page_size = self.page_size.max(1);
        let page = self.page.max(1);
        let total = matched.len();
        let total_pages = total.div_ceil(page_size);

        let items = matched
            .into_iter()
            .skip((page - 1).saturating_mul(page_size))
            .take(page_size)
            .collect();

        AgentPage {
            items,
            total,
            page,
            page_size,
            total_pages,
        }
    }
}

fn compare(a: &Agent, b: &Agent, field: SortField) -> Ordering {
    match field {
        SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortField::Type => a.agent_type.to_lowercase().cmp(&b.agent_type.to_lowercase()),
        SortField::Voice => a.voice.to_lowercase().cmp(&b.voice.to_lowercase()),
        SortField::Created => a.created_at.cmp(&b.created_at),
        SortField::Updated => a.updated_at.cmp(&b.updated_at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn row(id: &str, name: &str, voice: &str, created: i64) -> Agent {
        Agent {
            id: id.to_string(),
            name: name.to_string(),
            agent_type: "openai (en-US)".to_string(),
            voice: voice.to_string(),
            created_at: Utc.timestamp_opt(created, 0).unwrap(),
            updated_at: Utc.timestamp_opt(created + 10, 0).unwrap(),
        }
    }

    fn rows() -> Vec<Agent> {
        vec![
            row("1", "Support Bot", "Maria (pia)", 300),
            row("2", "sales bot", "John (pia)", 100),
            row("3", "Reception", "Maria (pia)", 200),
        ]
    }

    #[test]
    fn test_default_sorts_newest_first() {
        let page = AgentQuery::default().apply(&rows());
        let ids: Vec<_> = page.items.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3", "2"]);
        assert_eq!(page.total, 3);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_search_is_case_insensitive_across_columns() {
        let by_name = AgentQuery::default().with_search("BOT").apply(&rows());
        assert_eq!(by_name.total, 2);

        let by_voice = AgentQuery::default().with_search("maria").apply(&rows());
        assert_eq!(by_voice.total, 2);

        let by_type = AgentQuery::default().with_search("OpenAI").apply(&rows());
        assert_eq!(by_type.total, 3);

        let blank = AgentQuery::default().with_search("   ").apply(&rows());
        assert_eq!(blank.total, 3);
    }

    #[test]
    fn test_name_sort_ignores_case() {
        let page = AgentQuery::default()
            .with_sort(SortField::Name, SortDirection::Asc)
            .apply(&rows());
        let names: Vec<_> = page.items.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Reception", "sales bot", "Support Bot"]);
    }

    #[test]
    fn test_pagination_bounds() {
        let query = AgentQuery::default().with_page(2, 2);
        let page = query.apply(&rows());
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.total_pages, 2);

        let past_end = AgentQuery::default().with_page(9, 2).apply(&rows());
        assert!(past_end.items.is_empty());
        assert_eq!(past_end.total, 3);

        let clamped = AgentQuery::default().with_page(0, 0).apply(&rows());
        assert_eq!(clamped.page, 1);
        assert_eq!(clamped.page_size, 1);
        assert_eq!(clamped.items.len(), 1);
    }

    #[test]
    fn test_toggle_sort() {
        let mut query = AgentQuery::default();
        query.toggle_sort(SortField::Created);
        assert_eq!(query.sort, Some((SortField::Created, SortDirection::Asc)));
        query.toggle_sort(SortField::Created);
        assert_eq!(query.sort, Some((SortField::Created, SortDirection::Desc)));
        query.toggle_sort(SortField::Voice);
        assert_eq!(query.sort, Some((SortField::Voice, SortDirection::Asc)));
    }

    #[test]
    fn test_sort_field_parse() {
        assert_eq!("Created_At".parse::<SortField>().unwrap(), SortField::Created);
        assert!("rank".parse::<SortField>().is_err());
    }
}
