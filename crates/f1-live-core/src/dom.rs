//! Page regions and the seam for writing HTML into them.

use std::fmt::Write as _;

/// Regions of the host page the updater writes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementId {
    /// Channel join indicator
    ConnectionStatus,
    /// Live/simulator indicator
    DataSource,
    /// Meeting, session and clock
    SessionInfo,
    /// Weather readings
    WeatherData,
    /// Track flag widget
    TrackStatus,
    /// Latest race control messages
    RaceControl,
    /// `<tbody>` of the timing table
    TimingTableBody,
}

impl ElementId {
    /// Every region, in page order.
    pub const ALL: [Self; 7] = [
        Self::ConnectionStatus,
        Self::DataSource,
        Self::SessionInfo,
        Self::WeatherData,
        Self::TrackStatus,
        Self::RaceControl,
        Self::TimingTableBody,
    ];

    /// The element's `id` attribute.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ConnectionStatus => "connection-status",
            Self::DataSource => "data-source",
            Self::SessionInfo => "session-info",
            Self::WeatherData => "weather-data",
            Self::TrackStatus => "track-status",
            Self::RaceControl => "race-control",
            Self::TimingTableBody => "timing-data-table-body",
        }
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Something that holds addressable elements.
pub trait Dom {
    /// Replace the contents of element `id`.
    ///
    /// Returns `false` if the element does not exist; nothing is written.
    fn set_inner_html(&mut self, id: &str, html: &str) -> bool;
}

/// In-memory page: an ordered set of elements and their current contents.
#[derive(Debug, Clone, Default)]
pub struct Page {
    elements: Vec<(String, String)>,
}

impl Page {
    /// A page with no elements.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A page with every region in [`ElementId::ALL`], all empty.
    #[must_use]
    pub fn standard() -> Self {
        Self::with_elements(ElementId::ALL.iter().map(|id| id.as_str()))
    }

    /// A page with the given element ids, all empty.
    #[must_use]
    pub fn with_elements<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut page = Self::new();
        for id in ids {
            page.add_element(id);
        }
        page
    }

    /// Add an empty element. Existing ids are left alone.
    pub fn add_element(&mut self, id: impl Into<String>) {
        let id = id.into();
        if !self.elements.iter().any(|(existing, _)| *existing == id) {
            self.elements.push((id, String::new()));
        }
    }

    /// Current contents of element `id`.
    #[must_use]
    pub fn inner_html(&self, id: &str) -> Option<&str> {
        self.elements
            .iter()
            .find(|(existing, _)| existing == id)
            .map(|(_, html)| html.as_str())
    }

    /// Render the page as a standalone HTML document, one `<div>` per element
    /// (the timing body is wrapped in a table).
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::from(
            "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>F1 Live Timing</title></head>\n<body>\n",
        );
        for (id, html) in &self.elements {
            if id == ElementId::TimingTableBody.as_str() {
                let _ = writeln!(out, "<table><tbody id=\"{id}\">{html}</tbody></table>");
            } else {
                let _ = writeln!(out, "<div id=\"{id}\">{html}</div>");
            }
        }
        out.push_str("</body>\n</html>\n");
        out
    }
}

impl Dom for Page {
    fn set_inner_html(&mut self, id: &str, html: &str) -> bool {
        match self.elements.iter_mut().find(|(existing, _)| existing == id) {
            Some((_, contents)) => {
                html.clone_into(contents);
                true
            }
            None => false,
        }
    }
}
