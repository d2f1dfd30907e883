use thiserror::Error;

/// 書籍作成時のバリデーションエラー
///
/// 検証は定義順に行われ、最初に見つかった違反のみが返される。
/// `Display` の文言はそのままクライアントへのエラーメッセージになる。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// タイトルまたは著者が空・未指定
    #[error("title and author are required")]
    MissingTitleOrAuthor,

    /// 出版年が1800年以前、または整数でない
    #[error("invalid date")]
    InvalidYear,

    /// 評価が0〜5の範囲外、または数値でない
    #[error("rating must be between 0 and 5")]
    RatingOutOfRange,

    /// ジャンルが文字列の配列でない
    #[error("genres must be an array")]
    GenresNotArray,
}
