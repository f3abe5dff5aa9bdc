// src/services/keywords.rs

//! Heuristic keyword classification.
//!
//! A keyword is shopping-like when it contains a commerce or product-category
//! term, or looks like a model number (`QN90`, `WH-1000`, `A 15`).
//! Shopping-like keywords are ranked by shopping score, the rest by
//! informational score; the two buckets never share a keyword.

use regex::Regex;

use crate::error::Result;
use crate::models::{KeywordBuckets, ScoredKeyword};

/// Commerce terms and product-category nouns, lowercase.
const SHOPPING_LEXICON: &[&str] = &[
    // commerce
    "추천", "리뷰", "후기", "최저가", "세일", "특가", "할인", "구매", "가격", "쿠폰", "가성비",
    "직구", "사은품",
    // categories
    "에어프라이어", "노트북", "청소기", "냉장고", "세탁기", "건조기", "식기세척기", "전자레인지",
    "밥솥", "커피머신", "공기청정기", "가습기", "제습기", "선풍기", "에어컨", "이어폰", "헤드폰",
    "스피커", "키보드", "마우스", "모니터", "태블릿", "스마트폰", "스마트워치", "카메라", "tv",
    "텀블러", "운동화", "캠핑", "유모차", "카시트", "영양제", "선크림", "샴푸", "매트리스", "의자",
];

/// Breaking-news phrases that make poor lifestyle topics.
const STOP_PHRASES: &[&str] = &[
    "속보", "단독", "사망", "사고", "논란", "의혹", "혐의", "구속", "기소", "포토",
];

const MODEL_NUMBER_PATTERN: &str = r"[A-Za-z]+[-\s]?\d{2,}";

/// Scores keywords for the informational and shopping buckets.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    model_number: Regex,
}

impl KeywordClassifier {
    pub fn new() -> Result<Self> {
        Ok(Self {
            model_number: Regex::new(MODEL_NUMBER_PATTERN)?,
        })
    }

    pub fn contains_shopping_lexicon(&self, keyword: &str) -> bool {
        let lowered = keyword.to_lowercase();
        SHOPPING_LEXICON.iter().any(|term| lowered.contains(term))
    }

    pub fn is_shopping_like(&self, keyword: &str) -> bool {
        self.contains_shopping_lexicon(keyword) || self.model_number.is_match(keyword)
    }

    pub fn contains_stop(&self, keyword: &str) -> bool {
        STOP_PHRASES.iter().any(|phrase| keyword.contains(phrase))
    }

    pub fn contains_hangul(&self, keyword: &str) -> bool {
        keyword.chars().any(is_hangul)
    }

    /// `min(len,20)/20 + 0.3·¬stop + 0.2·hangul − 0.7·shopping`
    pub fn info_score(&self, keyword: &str) -> f64 {
        let length = keyword.chars().count().min(20) as f64 / 20.0;
        length + 0.3 * flag(!self.contains_stop(keyword))
            + 0.2 * flag(self.contains_hangul(keyword))
            - 0.7 * flag(self.is_shopping_like(keyword))
    }

    /// `0.6·shopping + 0.2·lexicon + min(len,18)/18`
    pub fn shop_score(&self, keyword: &str) -> f64 {
        let length = keyword.chars().count().min(18) as f64 / 18.0;
        0.6 * flag(self.is_shopping_like(keyword))
            + 0.2 * flag(self.contains_shopping_lexicon(keyword))
            + length
    }

    /// Partition and rank keywords, best first. Ties keep input order.
    pub fn rank<S: AsRef<str>>(&self, keywords: &[S]) -> KeywordBuckets {
        let mut buckets = KeywordBuckets::default();
        for keyword in keywords {
            let term = keyword.as_ref();
            if self.is_shopping_like(term) {
                buckets.shopping.push(ScoredKeyword {
                    term: term.to_string(),
                    score: self.shop_score(term),
                });
            } else {
                buckets.informational.push(ScoredKeyword {
                    term: term.to_string(),
                    score: self.info_score(term),
                });
            }
        }
        buckets.shopping.sort_by(|a, b| b.score.total_cmp(&a.score));
        buckets.informational.sort_by(|a, b| b.score.total_cmp(&a.score));
        buckets
    }
}

fn flag(value: bool) -> f64 {
    if value { 1.0 } else { 0.0 }
}

fn is_hangul(c: char) -> bool {
    matches!(c, '\u{AC00}'..='\u{D7A3}' | '\u{1100}'..='\u{11FF}' | '\u{3130}'..='\u{318F}')
}
