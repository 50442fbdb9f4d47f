/// Content of the error page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorVm {
    pub status: u16,
    pub title: String,
    pub message: String,
}

impl ErrorVm {
    #[must_use]
    pub fn new(status: u16, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            title: title.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(404, "ページが見つかりません", message)
    }

    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(400, "リクエストが正しくありません", message)
    }

    #[must_use]
    pub fn internal() -> Self {
        Self::new(
            500,
            "エラーが発生しました",
            "時間をおいて再度お試しください。",
        )
    }
}
