use crate::error::{ContentError, ValidationError};
use serde::{Deserialize, Serialize};

pub const MIN_ENERGY_CREDITS: f64 = 100.0;
pub const MAX_ENERGY_CREDITS: f64 = 5000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartType {
    Line,
    Bar,
    Pie,
    Area,
}

impl ChartType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Bar => "bar",
            Self::Pie => "pie",
            Self::Area => "area",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDataPoint {
    pub name: String,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub year: String,
    pub title: String,
    pub description: String,
}

/// Content for one report section, as produced by the content provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedContent {
    pub markdown: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_data: Option<Vec<ChartDataPoint>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_type: Option<ChartType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_x_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_y_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeline_events: Option<Vec<TimelineEvent>>,
    /// Set when this value stands in for content that could not be produced.
    #[serde(skip)]
    pub fallback: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawGeneratedContent {
    #[serde(default)]
    markdown: Option<String>,
    #[serde(default)]
    chart_data: Option<Vec<ChartDataPoint>>,
    #[serde(default)]
    chart_type: Option<ChartType>,
    #[serde(default)]
    chart_title: Option<String>,
    #[serde(default)]
    chart_x_label: Option<String>,
    #[serde(default)]
    chart_y_label: Option<String>,
    #[serde(default)]
    timeline_events: Option<Vec<TimelineEvent>>,
}

impl GeneratedContent {
    pub fn from_markdown(markdown: impl Into<String>) -> Self {
        Self {
            markdown: markdown.into(),
            chart_data: None,
            chart_type: None,
            chart_title: None,
            chart_x_label: None,
            chart_y_label: None,
            timeline_events: None,
            fallback: false,
        }
    }

    /// Decodes and validates a provider payload.
    pub fn from_json(text: &str) -> Result<Self, ValidationError> {
        let raw: RawGeneratedContent =
            serde_json::from_str(text).map_err(|err| ValidationError::Decode {
                target: "section content",
                message: err.to_string(),
            })?;

        let markdown = raw
            .markdown
            .filter(|markdown| !markdown.trim().is_empty())
            .ok_or(ValidationError::MissingField("markdown"))?;

        if let Some(points) = &raw.chart_data {
            if points.iter().any(|point| !point.value.is_finite()) {
                return Err(ValidationError::NonFinite {
                    field: "chartData.value",
                });
            }
        }

        Ok(Self {
            markdown,
            chart_data: raw.chart_data,
            chart_type: raw.chart_type,
            chart_title: raw.chart_title,
            chart_x_label: raw.chart_x_label,
            chart_y_label: raw.chart_y_label,
            timeline_events: raw.timeline_events,
            fallback: false,
        })
    }

    /// Error notice shown in place of a section that could not be generated.
    pub fn fallback(error: &ContentError) -> Self {
        let mut content = Self::from_markdown(format!(
            "## 오류 발생\n\n\
             데이터를 불러오는 중 문제가 발생했습니다. API 키를 확인하거나 다시 시도해주세요.\n\n\
             - {error}"
        ));
        content.fallback = true;
        content
    }

    pub fn has_chart(&self) -> bool {
        self.chart_data
            .as_ref()
            .is_some_and(|points| !points.is_empty())
    }

    pub fn timeline(&self) -> &[TimelineEvent] {
        self.timeline_events.as_deref().unwrap_or(&[])
    }
}

/// A suggested project for the idea simulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectIdea {
    pub project_name: String,
    pub description: String,
    pub energy_credits: f64,
    pub reasoning: String,
    #[serde(skip)]
    pub placeholder: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProjectIdea {
    #[serde(default)]
    project_name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    energy_credits: Option<f64>,
    #[serde(default)]
    reasoning: Option<String>,
}

impl ProjectIdea {
    pub fn from_json(text: &str) -> Result<Self, ValidationError> {
        let raw: RawProjectIdea =
            serde_json::from_str(text).map_err(|err| ValidationError::Decode {
                target: "project idea",
                message: err.to_string(),
            })?;

        let credits = raw
            .energy_credits
            .ok_or(ValidationError::MissingField("energyCredits"))?;
        if !credits.is_finite() {
            return Err(ValidationError::NonFinite {
                field: "energyCredits",
            });
        }
        let clamped = credits.clamp(MIN_ENERGY_CREDITS, MAX_ENERGY_CREDITS);
        if clamped != credits {
            tracing::warn!(credits, clamped, "energy credits outside expected range");
        }

        Ok(Self {
            project_name: raw
                .project_name
                .ok_or(ValidationError::MissingField("projectName"))?,
            description: raw.description.unwrap_or_default(),
            energy_credits: clamped,
            reasoning: raw.reasoning.unwrap_or_default(),
            placeholder: false,
        })
    }

    pub fn placeholder() -> Self {
        Self {
            project_name: "시스템 오류".to_string(),
            description: "분석 중 오류가 발생했습니다.".to_string(),
            energy_credits: 0.0,
            reasoning: "API 연결을 확인해주세요.".to_string(),
            placeholder: true,
        }
    }
}
