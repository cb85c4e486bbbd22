//! KML overlay output
//!
//! The document layout is fixed: one `NetworkLink` pointing at the coverage
//! data and one `Placemark` with a single `Point` at the vessel position.

pub mod writer;

pub use writer::{OverlayError, OverlayWriter};

use crate::core::{now_ms, LastKnownState, Position};

/// Values rendered into one overlay document
#[derive(Debug, Clone, PartialEq)]
pub struct OverlaySnapshot {
    pub position: Position,
    /// Coverage URL; empty when no coverage has been fetched yet
    pub coverage_href: String,
    /// Staleness notes shown in the placemark description
    pub notes: Vec<String>,
}

impl OverlaySnapshot {
    /// Build a snapshot from the last known state.
    ///
    /// Returns `None` until a position has been fetched at least once.
    pub fn from_state(state: &LastKnownState, position_fresh: bool, coverage_fresh: bool) -> Option<Self> {
        let position = state.position?;
        let now = now_ms();
        let mut notes = Vec::new();

        if !position_fresh {
            notes.push(stale_note("Position", state.position_updated_ms, now));
        }
        if !coverage_fresh {
            notes.push(stale_note("Coverage", state.coverage_updated_ms, now));
        }

        Some(Self {
            position,
            coverage_href: state
                .coverage
                .as_ref()
                .map(|c| c.as_str().to_string())
                .unwrap_or_default(),
            notes,
        })
    }

    pub fn is_stale(&self) -> bool {
        !self.notes.is_empty()
    }

    /// Render the KML document
    pub fn to_kml(&self) -> String {
        let mut out = String::new();
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        out.push_str("<kml xmlns=\"http://www.opengis.net/kml/2.2\" xmlns:gx=\"http://www.google.com/kml/ext/2.2\">\n");
        out.push_str("    <Document id=\"97\">\n");
        out.push_str("        <NetworkLink id=\"98\">\n");
        out.push_str("            <name>Coverage</name>\n");
        out.push_str("            <Link id=\"99\">\n");
        out.push_str(&format!("                <href>{}</href>\n", escape_xml(&self.coverage_href)));
        out.push_str("                <viewRefreshMode>onRequest</viewRefreshMode>\n");
        out.push_str("            </Link>\n");
        out.push_str("        </NetworkLink>\n");
        out.push_str("        <Placemark id=\"101\">\n");
        out.push_str("            <name>Ship</name>\n");
        if self.is_stale() {
            out.push_str(&format!(
                "            <description>{}</description>\n",
                escape_xml(&self.notes.join("; "))
            ));
        }
        out.push_str("            <Point id=\"100\">\n");
        // KML coordinate tuples are longitude first.
        out.push_str(&format!(
            "                <coordinates>{},{}</coordinates>\n",
            self.position.lon, self.position.lat
        ));
        out.push_str("            </Point>\n");
        out.push_str("        </Placemark>\n");
        out.push_str("    </Document>\n");
        out.push_str("</kml>");
        out
    }
}

fn stale_note(what: &str, updated_ms: Option<u64>, now_ms: u64) -> String {
    match updated_ms {
        Some(ms) => format!("{} not refreshed for {}s", what, now_ms.saturating_sub(ms) / 1000),
        None => format!("{} unavailable", what),
    }
}

/// Escape the five XML special characters
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CoverageReference;

    fn fresh_state() -> LastKnownState {
        let mut state = LastKnownState::new();
        state.update_position(Position::new(12.34, 56.78));
        state.update_coverage(CoverageReference::new("http://x/y.kmz"));
        state
    }

    #[test]
    fn test_no_snapshot_without_position() {
        let mut state = LastKnownState::new();
        state.update_coverage(CoverageReference::new("http://x/y.kmz"));
        assert!(OverlaySnapshot::from_state(&state, false, true).is_none());
    }

    #[test]
    fn test_coordinates_are_lon_lat() {
        let kml = OverlaySnapshot::from_state(&fresh_state(), true, true).unwrap().to_kml();
        assert!(kml.contains("<coordinates>56.78,12.34</coordinates>"));
    }

    #[test]
    fn test_single_point_and_network_link() {
        for (position_fresh, coverage_fresh) in [(true, true), (false, true), (true, false), (false, false)] {
            let snapshot = OverlaySnapshot::from_state(&fresh_state(), position_fresh, coverage_fresh).unwrap();
            let kml = snapshot.to_kml();
            assert_eq!(kml.matches("<Point ").count(), 1);
            assert_eq!(kml.matches("<NetworkLink ").count(), 1);
            assert_eq!(kml.matches("<href>http://x/y.kmz</href>").count(), 1);
            assert_eq!(snapshot.is_stale(), !(position_fresh && coverage_fresh));
        }
    }

    #[test]
    fn test_fresh_document_layout() {
        let kml = OverlaySnapshot::from_state(&fresh_state(), true, true).unwrap().to_kml();
        assert!(kml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<kml xmlns=\"http://www.opengis.net/kml/2.2\""));
        assert!(kml.contains("<name>Coverage</name>"));
        assert!(kml.contains("<viewRefreshMode>onRequest</viewRefreshMode>"));
        assert!(kml.contains("<name>Ship</name>"));
        assert!(!kml.contains("<description>"));
        assert!(kml.ends_with("</kml>"));
    }

    #[test]
    fn test_stale_description() {
        let mut state = LastKnownState::new();
        state.update_position(Position::new(1.0, 2.0));
        let snapshot = OverlaySnapshot::from_state(&state, true, false).unwrap();
        assert_eq!(snapshot.coverage_href, "");
        assert_eq!(snapshot.notes, vec!["Coverage unavailable".to_string()]);
        assert!(snapshot.to_kml().contains("<description>Coverage unavailable</description>"));
    }

    #[test]
    fn test_href_is_escaped() {
        let mut state = LastKnownState::new();
        state.update_position(Position::new(1.0, 2.0));
        state.update_coverage(CoverageReference::new("http://x/a.kmz?u=1&k=<2>"));
        let kml = OverlaySnapshot::from_state(&state, true, true).unwrap().to_kml();
        assert!(kml.contains("<href>http://x/a.kmz?u=1&amp;k=&lt;2&gt;</href>"));
    }
}
