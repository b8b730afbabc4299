//! Table output for article listings and ranking diagnostics, via comfy-table.

use std::env;

use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};

use crate::domain::models::{Article, ArticleStatus, RankedPassage};

use super::{single_line, truncate};

/// Table formatter for CLI output
pub struct TableFormatter {
    use_colors: bool,
}

impl TableFormatter {
    pub fn new() -> Self {
        Self {
            use_colors: supports_color(),
        }
    }

    pub const fn with_colors(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Format stored articles as a table
    pub fn format_articles(&self, articles: &[Article]) -> String {
        let mut table = base_table();
        table.set_header(vec![
            header("ID"),
            header("Title"),
            header("Status"),
            header("Tags"),
            header("Updated"),
        ]);

        for article in articles {
            let status = if self.use_colors {
                Cell::new(article.status).fg(status_color(article.status))
            } else {
                Cell::new(article.status)
            };
            let tags = if article.tags.is_empty() {
                "-".to_string()
            } else {
                article.tags.join(", ")
            };

            table.add_row(vec![
                Cell::new(truncate(&article.id, 36)),
                Cell::new(truncate(&article.title, 40)),
                status,
                Cell::new(truncate(&tags, 30)),
                Cell::new(article.updated_at.format("%Y-%m-%d %H:%M").to_string()),
            ]);
        }

        table.to_string()
    }

    /// Format scored passages as a table
    pub fn format_ranking(&self, ranked: &[RankedPassage]) -> String {
        let mut table = base_table();
        table.set_header(vec![
            header("#"),
            header("Score"),
            header("Article"),
            header("Passage"),
            header("Excerpt"),
        ]);

        for (position, entry) in ranked.iter().enumerate() {
            let score = format!("{:.3}", entry.score);
            let score = if self.use_colors {
                Cell::new(score).fg(Color::Cyan)
            } else {
                Cell::new(score)
            };

            table.add_row(vec![
                Cell::new(position + 1),
                score,
                Cell::new(truncate(&entry.passage.article.title, 30)),
                Cell::new(&entry.passage.passage.id),
                Cell::new(truncate(&single_line(&entry.passage.passage.text), 60)),
            ]);
        }

        table.to_string()
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn base_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn header(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}

const fn status_color(status: ArticleStatus) -> Color {
    match status {
        ArticleStatus::Published => Color::Green,
        ArticleStatus::Draft => Color::Yellow,
    }
}

fn supports_color() -> bool {
    // Respect NO_COLOR environment variable
    if env::var("NO_COLOR").is_ok() {
        return false;
    }

    env::var("TERM").map_or(true, |term| term != "dumb")
}
