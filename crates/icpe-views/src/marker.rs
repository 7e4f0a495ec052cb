//! Markers, popups and marker layers

use icpe_core::{FieldSchema, GeoPoint, Record};
use uuid::Uuid;

/// Identifier of a layer added to a map surface
pub type LayerId = Uuid;

/// One line of a marker popup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupLine {
    Text(String),
    Link { label: String, url: String },
}

/// Popup content for a marker
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Popup {
    lines: Vec<PopupLine>,
}

impl Popup {
    /// Label of the external record sheet link
    pub const LINK_LABEL: &'static str = "voir fiche";

    /// Present, non-blank popup attributes in schema order, then the link
    pub fn for_record(record: &Record, fields: &FieldSchema) -> Self {
        let mut lines: Vec<PopupLine> = fields
            .popup
            .iter()
            .filter_map(|key| record.non_empty_attribute(key))
            .map(|value| PopupLine::Text(value.to_string()))
            .collect();

        if let Some(url) = fields.link.as_deref().and_then(|key| record.non_empty_attribute(key)) {
            lines.push(PopupLine::Link {
                label: Self::LINK_LABEL.to_string(),
                url: url.to_string(),
            });
        }

        Self { lines }
    }

    pub fn lines(&self) -> &[PopupLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// First text line, used as the popup title
    pub fn title(&self) -> Option<&str> {
        self.lines.iter().find_map(|line| match line {
            PopupLine::Text(text) => Some(text.as_str()),
            PopupLine::Link { .. } => None,
        })
    }

    /// Every line except the one used as [`Popup::title`]
    pub fn body(&self) -> impl Iterator<Item = &PopupLine> {
        let title_at = self.lines.iter().position(|line| matches!(line, PopupLine::Text(_)));
        self.lines
            .iter()
            .enumerate()
            .filter(move |(i, _)| Some(*i) != title_at)
            .map(|(_, line)| line)
    }

    /// HTML fragment with one `<br />`-separated line per entry
    pub fn to_html(&self) -> String {
        self.lines
            .iter()
            .map(|line| match line {
                PopupLine::Text(text) => escape_html(text),
                PopupLine::Link { label, url } => format!(
                    r#"<a target="_blank" href="{}"> {} </a>"#,
                    escape_html(url),
                    escape_html(label)
                ),
            })
            .collect::<Vec<_>>()
            .join("<br />")
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// A drawable marker for one accepted record
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// Position of the record in the store
    pub record_index: usize,
    pub point: GeoPoint,
    pub popup: Popup,
}

impl Marker {
    pub fn for_record(record_index: usize, record: &Record, fields: &FieldSchema) -> Self {
        Self {
            record_index,
            point: *record.point(),
            popup: Popup::for_record(record, fields),
        }
    }
}

/// The markers produced by one selection pass
#[derive(Debug, Clone)]
pub struct MarkerLayer {
    id: LayerId,
    markers: Vec<Marker>,
}

impl MarkerLayer {
    pub fn new(markers: Vec<Marker>) -> Self {
        Self {
            id: Uuid::new_v4(),
            markers,
        }
    }

    pub fn id(&self) -> LayerId {
        self.id
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn acme() -> Record {
        Record::new(GeoPoint::new(48.1, -2.5))
            .with_attribute("nom_ets", "Acme & Fils")
            .with_attribute("lib_naf", "Fabrication de <produits>")
            .with_attribute("famille_ic", "")
            .with_attribute("nom_commune", "Rennes")
            .with_attribute("url_fiche", "https://example.org/fiche?id=1&x=\"2\"")
    }

    #[test]
    fn test_popup_follows_schema_order_and_skips_blank() {
        let popup = Popup::for_record(&acme(), &FieldSchema::default());

        assert_eq!(
            popup.lines(),
            &[
                PopupLine::Text("Acme & Fils".to_string()),
                PopupLine::Text("Fabrication de <produits>".to_string()),
                PopupLine::Text("Rennes".to_string()),
                PopupLine::Link {
                    label: "voir fiche".to_string(),
                    url: "https://example.org/fiche?id=1&x=\"2\"".to_string(),
                },
            ]
        );
        assert_eq!(popup.title(), Some("Acme & Fils"));
    }

    #[test]
    fn test_popup_html_is_escaped() {
        let html = Popup::for_record(&acme(), &FieldSchema::default()).to_html();

        assert_eq!(
            html,
            "Acme &amp; Fils<br />Fabrication de &lt;produits&gt;<br />Rennes<br />\
             <a target=\"_blank\" href=\"https://example.org/fiche?id=1&amp;x=&quot;2&quot;\"> voir fiche </a>"
        );
    }

    #[test]
    fn test_record_without_popup_fields_has_empty_popup() {
        let record = Record::new(GeoPoint::new(48.1, -2.5)).with_attribute("num_dep", "35");
        let popup = Popup::for_record(&record, &FieldSchema::default());

        assert!(popup.is_empty());
        assert_eq!(popup.title(), None);
        assert_eq!(popup.to_html(), "");
    }

    #[test]
    fn test_body_omits_title_line() {
        let popup = Popup::for_record(&acme(), &FieldSchema::default());

        let body: Vec<_> = popup.body().cloned().collect();
        assert_eq!(body.len(), 3);
        assert_eq!(body[0], PopupLine::Text("Fabrication de <produits>".to_string()));
    }

    #[test]
    fn test_link_only_popup_keeps_link_in_body() {
        let record = Record::new(GeoPoint::new(48.1, -2.5)).with_attribute("url_fiche", "https://example.org/fiche");
        let popup = Popup::for_record(&record, &FieldSchema::default());

        assert_eq!(popup.title(), None);
        assert_eq!(
            popup.body().cloned().collect::<Vec<_>>(),
            vec![PopupLine::Link {
                label: "voir fiche".to_string(),
                url: "https://example.org/fiche".to_string(),
            }]
        );
    }

    #[test]
    fn test_layers_get_distinct_ids() {
        assert_ne!(MarkerLayer::new(Vec::new()).id(), MarkerLayer::new(Vec::new()).id());
    }
}
