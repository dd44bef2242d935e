//! Legend and side panel content.
//!
//! Panels are plain data: a title and a list of widgets. Front-ends decide
//! how to draw them; the [`Display`](std::fmt::Display) impl renders a
//! panel as plain text for the terminal.

use std::fmt;

use landcover_viewer_models::Color;

use crate::config::PanelConfig;

/// Title of the legend panel.
pub const LEGEND_TITLE: &str = "Legend";

/// Text emphasis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStyle {
    /// Bold body text.
    Bold,
    /// Regular body text.
    Body,
    /// De-emphasized text.
    Muted,
}

/// One row of a panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Widget {
    /// A text line.
    Label {
        /// Text.
        text: String,
        /// Emphasis.
        style: TextStyle,
    },
    /// A label followed by a colored box.
    Swatch {
        /// Class name.
        label: String,
        /// Box fill.
        color: Color,
    },
    /// A bulleted list.
    Bullets(Vec<String>),
    /// A hyperlink.
    Link {
        /// Link text.
        text: String,
        /// Target URL.
        url: String,
    },
}

impl Widget {
    fn label(text: impl Into<String>, style: TextStyle) -> Self {
        Self::Label {
            text: text.into(),
            style,
        }
    }
}

/// A titled list of widgets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    /// Heading shown above the widgets.
    pub title: String,
    /// Rows, top to bottom.
    pub widgets: Vec<Widget>,
}

/// Legend with a single swatch row for `class_label`.
#[must_use]
pub fn build_legend(class_label: &str, swatch_color: Color) -> Panel {
    Panel {
        title: LEGEND_TITLE.to_string(),
        widgets: vec![Widget::Swatch {
            label: class_label.to_string(),
            color: swatch_color,
        }],
    }
}

/// The static side panel: what the viewer shows, where the data comes from,
/// and who built it.
#[must_use]
pub fn build_info_panel(config: &PanelConfig) -> Panel {
    let mut widgets = vec![
        Widget::label(&config.instruction, TextStyle::Muted),
        Widget::label(&config.description, TextStyle::Body),
        Widget::label(&config.data_source_heading, TextStyle::Bold),
    ];
    if !config.data_sources.is_empty() {
        widgets.push(Widget::Bullets(config.data_sources.clone()));
    }
    widgets.extend([
        Widget::label(&config.credits, TextStyle::Bold),
        Widget::label(&config.lab, TextStyle::Body),
        Widget::Link {
            text: config.link_text.clone(),
            url: config.link_url.clone(),
        },
    ]);

    Panel {
        title: config.title.clone(),
        widgets,
    }
}

impl fmt::Display for Widget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Label { text, style } => match style {
                TextStyle::Bold => write!(f, "**{text}**"),
                TextStyle::Body => write!(f, "{text}"),
                TextStyle::Muted => write!(f, "({text})"),
            },
            Self::Swatch { label, color } => write!(f, "{label} [#{color}]"),
            Self::Bullets(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "  - {item}")?;
                }
                Ok(())
            }
            Self::Link { text, url } => write!(f, "{text} <{url}>"),
        }
    }
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", "-".repeat(self.title.chars().count()))?;
        for widget in &self.widgets {
            writeln!(f, "{widget}")?;
        }
        Ok(())
    }
}
