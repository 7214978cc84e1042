pub mod content;
pub mod state;

pub use content::{ChartDataPoint, ChartType, GeneratedContent, ProjectIdea, TimelineEvent};
pub use state::{SectionStatus, SessionState};

use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineItem {
    pub id: String,
    pub title: String,
    pub sub_items: Vec<String>,
}

impl OutlineItem {
    pub fn new(id: &str, title: &str, sub_items: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            sub_items: sub_items.iter().map(|item| item.to_string()).collect(),
        }
    }

    /// Title text before the em dash, used for compact navigation labels.
    pub fn short_title(&self) -> &str {
        self.title
            .split('\u{2014}')
            .next()
            .map(str::trim)
            .unwrap_or(&self.title)
    }
}

/// Ordered, immutable list of report sections known at startup.
#[derive(Debug, Clone)]
pub struct Outline {
    items: Arc<[OutlineItem]>,
}

impl Outline {
    pub fn new(items: Vec<OutlineItem>) -> Self {
        Self {
            items: items.into(),
        }
    }

    pub fn items(&self) -> &[OutlineItem] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&OutlineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn first(&self) -> Option<&OutlineItem> {
        self.items.first()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn ids(&self) -> Vec<String> {
        self.items.iter().map(|item| item.id.clone()).collect()
    }
}

pub const IDEA_SECTION_ID: &str = "project-society";

pub fn post_labor_outline() -> Outline {
    Outline::new(vec![
        OutlineItem::new(
            "intro",
            "서론 \u{2014} 노동이라는 시스템은 어떻게 무너지는가",
            &[
                "기술혁명 속도 > 규제·교육·계층의 적응 속도",
                "인간 노동의 가격이 떨어지는 이유",
            ],
        ),
        OutlineItem::new(
            "automation-shock",
            "AI·로봇 자동화의 구조적 충격",
            &[
                "한국 직업군의 자동화 위험률",
                "제조·물류·백오피스의 선제적 붕괴",
                "화이트칼라의 붕괴는 블루칼라보다 늦게 온다",
            ],
        ),
        OutlineItem::new(
            "energy-currency",
            "에너지 기반 화폐 시스템의 등장",
            &[
                "탄소·전기·ESS·H2 기반 단위가 화폐 역할",
                "노동→에너지 전환의 경제학",
            ],
        ),
        OutlineItem::new(
            "surplus-humanity",
            "잉여인간 문제를 어떻게 해결할 것인가",
            &[
                "문제: \u{201c}일이 없는데 소득을 어떻게 배분할까?\u{201d}",
                "더 큰 문제: \u{201c}일 없이 인간은 어떻게 자존감을 유지할까?\u{201d}",
            ],
        ),
        OutlineItem::new(
            IDEA_SECTION_ID,
            "Project Society 모델",
            &[
                "생존노동 → 프로젝트 수행",
                "소비자 → 창작·연구·교육·탐험 주체로 변화",
                "기초 프로젝트 자금(BPF)의 개념",
            ],
        ),
        OutlineItem::new(
            "policy",
            "정책 과제",
            &[
                "기본소득 → 기본 프로젝트 투자금",
                "교육: 산업 중심 → 프로젝트 중심",
                "AI 파트너십 기반의 개인 생산성 혁명",
                "세금 구조: 로봇세, AI세, 에너지세 설계",
            ],
        ),
        OutlineItem::new(
            "conclusion",
            "결론 \u{2014} 인류는 어디로 가는가",
            &[
                "생존경제 → 탐험경제로의 이동",
                "2035~2050 3단계 시나리오",
            ],
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn outline_ids_are_unique() {
        let outline = post_labor_outline();
        let ids: BTreeSet<String> = outline.ids().into_iter().collect();
        assert_eq!(ids.len(), outline.len());
        assert_eq!(outline.first().map(|item| item.id.as_str()), Some("intro"));
    }

    #[test]
    fn short_title_drops_subtitle_after_dash() {
        let outline = post_labor_outline();
        let intro = outline.get("intro").expect("intro exists");
        assert_eq!(intro.short_title(), "서론");
        let policy = outline.get("policy").expect("policy exists");
        assert_eq!(policy.short_title(), "정책 과제");
    }

    #[test]
    fn idea_section_is_part_of_outline() {
        assert!(post_labor_outline().get(IDEA_SECTION_ID).is_some());
    }
}
