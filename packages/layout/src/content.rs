//! # Widget Content
//!
//! Leaf widgets placed in layout items, the references they may hold to
//! content that lives outside the layout (visualization definitions), and the
//! size profile each content type imposes on its item.

use crate::layout::{Item, ItemContent};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Opaque reference to content that must be fetched before it can be sized
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentRef(pub String);

impl ContentRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Visualization type of a resolved insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VisType {
    Area,
    Bar,
    Bubble,
    Bullet,
    Column,
    Combo,
    Donut,
    Funnel,
    Headline,
    Heatmap,
    Line,
    Pie,
    Pushpin,
    Repeater,
    Scatter,
    Table,
    Treemap,
    Xirr,
}

/// Fetched definition of a visualization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualizationDefinition {
    pub reference: ContentRef,
    pub title: String,
    pub vis_type: VisType,
}

/// Definitions fetched for content references
pub type ResolvedContent = HashMap<ContentRef, VisualizationDefinition>;

/// Insight content, either still referenced or already resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InsightContent {
    Ref { reference: ContentRef },
    Inline { definition: VisualizationDefinition },
}

impl InsightContent {
    pub fn reference(reference: impl Into<String>) -> Self {
        InsightContent::Ref {
            reference: ContentRef::new(reference),
        }
    }

    /// Reference that still needs resolving
    pub fn unresolved(&self) -> Option<&ContentRef> {
        match self {
            InsightContent::Ref { reference } => Some(reference),
            InsightContent::Inline { .. } => None,
        }
    }

    pub fn content_ref(&self) -> &ContentRef {
        match self {
            InsightContent::Ref { reference } => reference,
            InsightContent::Inline { definition } => &definition.reference,
        }
    }

    pub fn vis_type(&self) -> Option<VisType> {
        match self {
            InsightContent::Ref { .. } => None,
            InsightContent::Inline { definition } => Some(definition.vis_type),
        }
    }

    /// Replace a reference with its fetched definition. Returns true if
    /// something was substituted.
    pub fn substitute(&mut self, resolved: &ResolvedContent) -> bool {
        let definition = match self {
            InsightContent::Ref { reference } => match resolved.get(reference) {
                Some(definition) => definition.clone(),
                None => return false,
            },
            InsightContent::Inline { .. } => return false,
        };
        *self = InsightContent::Inline { definition };
        true
    }
}

/// Leaf widget kinds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WidgetKind {
    Insight { insight: InsightContent },
    Kpi { measure: String },
    RichText { markdown: String },
    VisualizationSwitcher { visualizations: Vec<InsightContent> },
}

impl WidgetKind {
    /// Content references this widget still needs resolved
    pub fn unresolved_refs(&self) -> Vec<&ContentRef> {
        match self {
            WidgetKind::Insight { insight } => insight.unresolved().into_iter().collect(),
            WidgetKind::VisualizationSwitcher { visualizations } => {
                visualizations.iter().filter_map(|v| v.unresolved()).collect()
            }
            WidgetKind::Kpi { .. } | WidgetKind::RichText { .. } => Vec::new(),
        }
    }

    /// Substitute every resolvable reference, returning how many were replaced
    pub fn substitute(&mut self, resolved: &ResolvedContent) -> usize {
        match self {
            WidgetKind::Insight { insight } => usize::from(insight.substitute(resolved)),
            WidgetKind::VisualizationSwitcher { visualizations } => visualizations
                .iter_mut()
                .map(|v| usize::from(v.substitute(resolved)))
                .sum(),
            WidgetKind::Kpi { .. } | WidgetKind::RichText { .. } => 0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            WidgetKind::Insight { .. } => "insight",
            WidgetKind::Kpi { .. } => "kpi",
            WidgetKind::RichText { .. } => "richText",
            WidgetKind::VisualizationSwitcher { .. } => "visualizationSwitcher",
        }
    }
}

/// Grid bounds a content type imposes on its item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeProfile {
    pub default_width: u32,
    pub min_width: u32,
    pub default_height: u32,
    pub min_height: u32,
    pub max_height: u32,
}

const MAX_HEIGHT: u32 = 40;

const INSIGHT_PROFILE: SizeProfile = SizeProfile {
    default_width: 6,
    min_width: 2,
    default_height: 22,
    min_height: 12,
    max_height: MAX_HEIGHT,
};

const KPI_PROFILE: SizeProfile = SizeProfile {
    default_width: 2,
    min_width: 2,
    default_height: 11,
    min_height: 8,
    max_height: MAX_HEIGHT,
};

const RICH_TEXT_PROFILE: SizeProfile = SizeProfile {
    default_width: 12,
    min_width: 1,
    default_height: 4,
    min_height: 1,
    max_height: MAX_HEIGHT,
};

const CONTAINER_PROFILE: SizeProfile = SizeProfile {
    default_width: 12,
    min_width: 1,
    default_height: 1,
    min_height: 1,
    max_height: u32::MAX,
};

impl SizeProfile {
    /// Profile for a resolved visualization type
    pub fn for_vis_type(vis_type: VisType) -> Self {
        match vis_type {
            VisType::Headline => SizeProfile {
                default_width: 2,
                min_width: 2,
                default_height: 11,
                min_height: 6,
                max_height: MAX_HEIGHT,
            },
            VisType::Table | VisType::Repeater => SizeProfile {
                default_width: 12,
                min_width: 3,
                default_height: 22,
                min_height: 14,
                max_height: MAX_HEIGHT,
            },
            VisType::Pushpin => SizeProfile {
                default_width: 6,
                min_width: 6,
                default_height: 22,
                min_height: 12,
                max_height: MAX_HEIGHT,
            },
            VisType::Xirr => SizeProfile {
                default_width: 2,
                min_width: 2,
                default_height: 11,
                min_height: 6,
                max_height: MAX_HEIGHT,
            },
            _ => INSIGHT_PROFILE,
        }
    }

    pub fn for_insight(insight: &InsightContent) -> Self {
        Self::for_insight_in(insight, &ResolvedContent::new())
    }

    /// Profile for an insight, consulting fetched definitions for references
    pub fn for_insight_in(insight: &InsightContent, resolved: &ResolvedContent) -> Self {
        insight
            .vis_type()
            .or_else(|| {
                insight
                    .unresolved()
                    .and_then(|r| resolved.get(r))
                    .map(|d| d.vis_type)
            })
            .map(Self::for_vis_type)
            .unwrap_or(INSIGHT_PROFILE)
    }

    pub fn for_widget(kind: &WidgetKind) -> Self {
        Self::for_widget_in(kind, &ResolvedContent::new())
    }

    pub fn for_widget_in(kind: &WidgetKind, resolved: &ResolvedContent) -> Self {
        match kind {
            WidgetKind::Insight { insight } => Self::for_insight_in(insight, resolved),
            WidgetKind::Kpi { .. } => KPI_PROFILE,
            WidgetKind::RichText { .. } => RICH_TEXT_PROFILE,
            // The switcher must fit the most demanding of its visualizations
            WidgetKind::VisualizationSwitcher { visualizations } => visualizations
                .iter()
                .map(|v| Self::for_insight_in(v, resolved))
                .fold(INSIGHT_PROFILE, |acc, p| SizeProfile {
                    default_width: acc.default_width.max(p.default_width),
                    min_width: acc.min_width.max(p.min_width),
                    default_height: acc.default_height.max(p.default_height),
                    min_height: acc.min_height.max(p.min_height),
                    max_height: acc.max_height.min(p.max_height),
                }),
        }
    }

    pub fn for_item(item: &Item, resolved: &ResolvedContent) -> Self {
        match &item.content {
            ItemContent::Widget(widget) => Self::for_widget_in(&widget.kind, resolved),
            ItemContent::Container(_) => CONTAINER_PROFILE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved(vis_type: VisType) -> InsightContent {
        InsightContent::Inline {
            definition: VisualizationDefinition {
                reference: ContentRef::new("vis-1"),
                title: "Revenue".to_string(),
                vis_type,
            },
        }
    }

    #[test]
    fn test_table_needs_more_room_than_kpi() {
        let table = SizeProfile::for_vis_type(VisType::Table);
        let kpi = SizeProfile::for_widget(&WidgetKind::Kpi {
            measure: "m".to_string(),
        });
        assert!(table.min_height > kpi.min_height);
    }

    #[test]
    fn test_unresolved_insight_uses_generic_profile() {
        let kind = WidgetKind::Insight {
            insight: InsightContent::reference("vis-1"),
        };
        assert_eq!(SizeProfile::for_widget(&kind), INSIGHT_PROFILE);
        assert_eq!(kind.unresolved_refs(), vec![&ContentRef::new("vis-1")]);
    }

    #[test]
    fn test_switcher_takes_strictest_bounds() {
        let kind = WidgetKind::VisualizationSwitcher {
            visualizations: vec![resolved(VisType::Headline), resolved(VisType::Table)],
        };
        let profile = SizeProfile::for_widget(&kind);
        assert_eq!(profile.min_height, 14);
        assert_eq!(profile.min_width, 3);
        assert!(kind.unresolved_refs().is_empty());
    }

    #[test]
    fn test_substitute_uses_fetched_definition() {
        let mut kind = WidgetKind::Insight {
            insight: InsightContent::reference("vis-1"),
        };
        let mut fetched = ResolvedContent::new();
        fetched.insert(
            ContentRef::new("vis-1"),
            VisualizationDefinition {
                reference: ContentRef::new("vis-1"),
                title: "Revenue".to_string(),
                vis_type: VisType::Table,
            },
        );

        // profile lookup sees the fetched type before substitution
        assert_eq!(SizeProfile::for_widget_in(&kind, &fetched).min_height, 14);

        assert_eq!(kind.substitute(&fetched), 1);
        assert!(kind.unresolved_refs().is_empty());
        assert_eq!(kind.substitute(&fetched), 0);
    }

    #[test]
    fn test_insight_content_json_shape() {
        let content = InsightContent::reference("vis-7");
        let json = serde_json::to_value(&content).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "type": "ref", "reference": "vis-7" })
        );
    }
}
