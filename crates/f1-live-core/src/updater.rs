//! The live view updater: state, dispatch and page writes in one place.

use crate::dom::Dom;
use crate::feed::Inbound;
use crate::render;
use crate::state::ClientState;

/// Updater options.
#[derive(Debug, Clone, Default)]
pub struct UpdaterConfig {
    /// Redraw the timing table when a `DriverList` update arrives, instead of
    /// waiting for the next `TimingData` update to pick up new names.
    pub redraw_on_driver_list: bool,
}

/// Owns the client state and the page it renders into.
pub struct Updater<D: Dom> {
    state: ClientState,
    dom: D,
    config: UpdaterConfig,
}

impl<D: Dom> Updater<D> {
    /// Create an updater with empty state.
    #[must_use]
    pub fn new(dom: D, config: UpdaterConfig) -> Self {
        Self {
            state: ClientState::new(),
            dom,
            config,
        }
    }

    /// Handle one inbound message.
    ///
    /// Returns `true` if a page region was rewritten.
    pub fn handle(&mut self, inbound: Inbound) -> bool {
        let Some(instruction) = self.state.apply(inbound, &self.config) else {
            return false;
        };

        let fragment = render::render(&self.state, &instruction);
        let written = self
            .dom
            .set_inner_html(fragment.target.as_str(), &fragment.html);

        if written {
            tracing::debug!(
                target_id = %fragment.target,
                html_len = fragment.html.len(),
                "Rendered region"
            );
        } else {
            tracing::debug!(target_id = %fragment.target, "Element missing, update skipped");
        }
        written
    }

    /// Current client state.
    #[must_use]
    pub fn state(&self) -> &ClientState {
        &self.state
    }

    /// The page being rendered into.
    #[must_use]
    pub fn dom(&self) -> &D {
        &self.dom
    }

    /// Consume the updater, returning the page.
    #[must_use]
    pub fn into_dom(self) -> D {
        self.dom
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{ElementId, Page};
    use crate::feed::{ConnectionStatus, DataSource, FeedKind, FeedUpdate};
    use serde_json::{json, Value};

    fn feed(kind: FeedKind, data: Value) -> Inbound {
        Inbound::Feed(FeedUpdate::decode(kind, data).unwrap())
    }

    #[test]
    fn connection_status_is_written() {
        let mut updater = Updater::new(Page::standard(), UpdaterConfig::default());

        assert!(updater.handle(Inbound::Connection(ConnectionStatus::Connected)));
        let html = updater.dom().inner_html("connection-status").unwrap();
        assert!(html.contains("Connected"));

        assert!(updater.handle(Inbound::Connection(ConnectionStatus::Disconnected)));
        let html = updater.dom().inner_html("connection-status").unwrap();
        assert!(html.contains("Disconnected"));
    }

    #[test]
    fn missing_element_is_skipped() {
        let mut updater = Updater::new(
            Page::with_elements([ElementId::TrackStatus.as_str()]),
            UpdaterConfig::default(),
        );

        assert!(!updater.handle(Inbound::DataSource(DataSource::Live)));
        assert!(updater.handle(feed(FeedKind::TrackStatus, json!({"Status": "7"}))));
        assert!(updater
            .dom()
            .inner_html("track-status")
            .unwrap()
            .contains("Safety Car"));
    }

    #[test]
    fn driver_names_appear_on_next_timing_update() {
        let mut updater = Updater::new(Page::standard(), UpdaterConfig::default());

        updater.handle(feed(FeedKind::TimingData, json!({"Lines": {"14": {"Position": 1}}})));
        assert!(!updater.handle(feed(
            FeedKind::DriverList,
            json!({"14": {"Tla": "ALO", "FullName": "Fernando Alonso"}})
        )));
        let body = updater.dom().inner_html("timing-data-table-body").unwrap();
        assert!(!body.contains("ALO"));

        updater.handle(feed(FeedKind::TimingData, json!({"Lines": {}})));
        let body = updater.dom().inner_html("timing-data-table-body").unwrap();
        assert!(body.contains("ALO"));
    }

    #[test]
    fn driver_list_redraw_when_enabled() {
        let mut updater = Updater::new(
            Page::standard(),
            UpdaterConfig {
                redraw_on_driver_list: true,
            },
        );

        updater.handle(feed(FeedKind::TimingData, json!({"Lines": {"14": {"Position": 1}}})));
        assert!(updater.handle(feed(
            FeedKind::DriverList,
            json!({"14": {"Tla": "ALO"}})
        )));
        let body = updater.dom().inner_html("timing-data-table-body").unwrap();
        assert!(body.contains("ALO"));
    }

    #[test]
    fn ignored_updates_leave_page_untouched() {
        let mut updater = Updater::new(Page::standard(), UpdaterConfig::default());

        assert!(!updater.handle(feed(FeedKind::WeatherData, Value::Null)));
        assert!(!updater.handle(feed(FeedKind::RaceControlMessages, json!({}))));
        assert_eq!(updater.dom().inner_html("weather-data"), Some(""));
        assert_eq!(updater.dom().inner_html("race-control"), Some(""));
    }
}
