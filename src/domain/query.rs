use serde_json::Value;
use std::cmp::Ordering;

use super::book::Document;

/// 並び替え可能なフィールド
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Rating,
    Year,
}

impl SortField {
    /// ドキュメント上のフィールド名
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Rating => "rating",
            SortField::Year => "year",
        }
    }

    /// `rating` / `year` 以外は並び替えなしとして扱う
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "rating" => Some(SortField::Rating),
            "year" => Some(SortField::Year),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// `desc` のみ降順。それ以外（未指定を含む）は昇順。
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("desc") => SortDirection::Descending,
            _ => SortDirection::Ascending,
        }
    }
}

/// 並び替え指定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn parse(field: Option<&str>, direction: Option<&str>) -> Option<Self> {
        let field = SortField::parse(field?)?;
        Some(Self {
            field,
            direction: SortDirection::parse(direction),
        })
    }

    /// 2つのドキュメントを並び替えフィールドで比較する
    ///
    /// 昇順では欠落・null が先頭、降順では末尾に来る。
    /// 型が異なる値は null < 文字列 < 数値 < 真偽値 < 配列 < オブジェクト の順。
    pub fn compare(&self, a: &Document, b: &Document) -> Ordering {
        let field = self.field.as_str();
        let ordering = compare_values(a.get(field), b.get(field));
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

fn type_rank(value: Option<&Value>) -> u8 {
    match value {
        None => 0,
        Some(Value::Null) => 1,
        Some(Value::String(_)) => 2,
        Some(Value::Number(_)) => 3,
        Some(Value::Bool(_)) => 4,
        Some(Value::Array(_)) => 5,
        Some(Value::Object(_)) => 6,
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

/// 一覧取得のフィルタ条件
///
/// 指定された条件はすべてAND結合される。`None` の条件は評価しない。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookFilter {
    /// 著者の完全一致
    pub author: Option<String>,
    /// 貸出可能フラグの一致
    pub available: Option<bool>,
    /// ジャンル配列に含まれる値との完全一致
    pub genre: Option<String>,
    /// 評価の下限（この値を含む）
    pub min_rating: Option<f64>,
}

impl BookFilter {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// ドキュメントがすべての条件を満たすか
    pub fn matches(&self, document: &Document) -> bool {
        if let Some(author) = &self.author {
            if document.get("author").and_then(Value::as_str) != Some(author.as_str()) {
                return false;
            }
        }

        if let Some(available) = self.available {
            if document.get("available").and_then(Value::as_bool) != Some(available) {
                return false;
            }
        }

        if let Some(genre) = &self.genre {
            let found = match document.get("genres") {
                Some(Value::Array(genres)) => {
                    genres.iter().any(|g| g.as_str() == Some(genre.as_str()))
                }
                Some(Value::String(single)) => single == genre,
                _ => false,
            };
            if !found {
                return false;
            }
        }

        if let Some(min_rating) = self.min_rating {
            // 数値でない評価は一致しない。NaN との比較は常に偽。
            let meets = document
                .get("rating")
                .and_then(Value::as_f64)
                .is_some_and(|rating| rating >= min_rating);
            if !meets {
                return false;
            }
        }

        true
    }
}

/// 一覧取得クエリ（フィルタ + 並び替え）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookQuery {
    pub filter: BookFilter,
    pub sort: Option<SortSpec>,
}

/// 空文字列は未指定と同じ扱い
pub fn parse_text(value: Option<&str>) -> Option<String> {
    value.filter(|s| !s.is_empty()).map(str::to_string)
}

/// `"true"` / `"false"` のみフィルタとして扱い、それ以外の値は無視する
pub fn parse_available(value: Option<&str>) -> Option<bool> {
    match value {
        Some("true") => Some(true),
        Some("false") => Some(false),
        _ => None,
    }
}

/// 先頭の数値部分だけを下限として使う（`"4.5abc"` は 4.5）
///
/// 数値で始まらない値は何にも一致しない（NaN）。
pub fn parse_min_rating(value: Option<&str>) -> Option<f64> {
    let value = value.filter(|s| !s.is_empty())?;
    let rating = leading_number(value.trim_start())
        .and_then(|number| number.parse::<f64>().ok())
        .unwrap_or(f64::NAN);
    Some(rating)
}

/// 符号・整数部・小数部・指数部からなる最長の先頭部分
fn leading_number(value: &str) -> Option<&str> {
    let bytes = value.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    if value[end..].starts_with("Infinity") {
        return Some(&value[..end + "Infinity".len()]);
    }

    let integer_digits = count_digits(&bytes[end..]);
    end += integer_digits;

    let mut fraction_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        fraction_digits = count_digits(&bytes[end + 1..]);
        if integer_digits > 0 || fraction_digits > 0 {
            end += 1 + fraction_digits;
        }
    }
    if integer_digits == 0 && fraction_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent = end + 1;
        if matches!(bytes.get(exponent), Some(b'+' | b'-')) {
            exponent += 1;
        }
        let exponent_digits = count_digits(&bytes[exponent..]);
        if exponent_digits > 0 {
            end = exponent + exponent_digits;
        }
    }

    Some(&value[..end])
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}
