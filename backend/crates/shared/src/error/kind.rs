//! Error Kind - Classification of errors
//!
//! Defines the [`ErrorKind`] enum used to classify both local failures and
//! error codes reported by remote services (identity provider, data store).

use serde::Serialize;

/// AWS 形式のエラーコードを正規化する
///
/// JSON プロトコルの `__type` は `com.amazonaws.dynamodb.v20120810#ExpiredTokenException`
/// のように名前空間付きで返されるため、`#` 以降のみを取り出します。
/// `x-amzn-ErrorType` ヘッダーの `:` 以降の付加情報も取り除きます。
///
/// ## Examples
/// ```rust
/// use kernel::error::kind::normalize_remote_code;
///
/// assert_eq!(
///     normalize_remote_code("com.amazonaws.dynamodb.v20120810#ExpiredTokenException"),
///     "ExpiredTokenException"
/// );
/// assert_eq!(normalize_remote_code("CredentialsError"), "CredentialsError");
/// ```
pub fn normalize_remote_code(raw: &str) -> &str {
    let code = raw.rsplit('#').next().unwrap_or(raw);
    code.split(':').next().unwrap_or(code).trim()
}

/// エラー種別の列挙体
///
/// リモート呼び出しの失敗を分類します。
/// 各バリアントは HTTP ステータスコードにもマッピングされます。
///
/// ## Notes
/// * `AuthorizationExpired` のみが「資格情報を更新して再試行」の対象です
/// * `non_exhaustive` - 将来的に列挙子が追加される可能性があることを示す
///
/// ## Examples
/// ```rust
/// use kernel::error::kind::ErrorKind;
///
/// let kind = ErrorKind::from_remote_code("CredentialsError");
/// assert_eq!(kind, ErrorKind::AuthorizationExpired);
/// assert!(kind.is_recoverable());
/// assert_eq!(kind.status_code(), 401);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorKind {
    /// 400 - Bad Request: リクエストが不正
    BadRequest,
    /// 401 - 資格情報が期限切れ、または無効
    AuthorizationExpired,
    /// 403 - Forbidden: アクセス権限なし
    AccessDenied,
    /// 404 - Not Found: リソース（テーブル等）が見つからない
    NotFound,
    /// 408 - Request Timeout: 応答待ちがタイムアウト
    RequestTimeout,
    /// 409 - Conflict: 現在の状態と競合
    Conflict,
    /// 429 - Too Many Requests: スロットリング
    Throttled,
    /// 500 - Internal Server Error: 内部エラー
    Internal,
    /// 502 - Bad Gateway: 通信層の失敗（接続不可、応答の解釈不可）
    Transport,
    /// 503 - Service Unavailable: サービス利用不可
    ServiceUnavailable,
}

impl ErrorKind {
    /// リモートのエラーコードを分類する
    ///
    /// 未知のコードは `Internal` に分類され、再試行の対象にはなりません。
    ///
    /// ## Arguments
    /// * `code` - `__type` などから得たエラーコード（名前空間付きでも可）
    pub fn from_remote_code(code: &str) -> Self {
        match normalize_remote_code(code) {
            "CredentialsError"
            | "ExpiredToken"
            | "ExpiredTokenException"
            | "UnrecognizedClientException"
            | "InvalidSignatureException"
            | "NotAuthorizedException"
            | "MissingAuthenticationToken"
            | "MissingAuthenticationTokenException"
            | "RequestExpired" => ErrorKind::AuthorizationExpired,

            "AccessDenied" | "AccessDeniedException" => ErrorKind::AccessDenied,

            "ResourceNotFoundException" => ErrorKind::NotFound,

            "ValidationException"
            | "SerializationException"
            | "InvalidParameterException"
            | "InvalidParameterValueException" => ErrorKind::BadRequest,

            "ConditionalCheckFailedException"
            | "TransactionConflictException"
            | "ResourceConflictException" => ErrorKind::Conflict,

            "ThrottlingException"
            | "ProvisionedThroughputExceededException"
            | "RequestLimitExceeded"
            | "TooManyRequestsException"
            | "LimitExceededException" => ErrorKind::Throttled,

            "TimeoutError" | "RequestTimeout" | "RequestTimeoutException" => {
                ErrorKind::RequestTimeout
            }

            "NetworkingError" | "UnknownEndpoint" => ErrorKind::Transport,

            "ServiceUnavailable" | "ServiceUnavailableException" => {
                ErrorKind::ServiceUnavailable
            }

            _ => ErrorKind::Internal,
        }
    }

    /// HTTP ステータスコードから分類する（エラーコードが得られない場合）
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => ErrorKind::AuthorizationExpired,
            403 => ErrorKind::AccessDenied,
            404 => ErrorKind::NotFound,
            408 => ErrorKind::RequestTimeout,
            409 => ErrorKind::Conflict,
            429 => ErrorKind::Throttled,
            503 => ErrorKind::ServiceUnavailable,
            400..=499 => ErrorKind::BadRequest,
            _ => ErrorKind::Internal,
        }
    }

    /// HTTP ステータスコードを取得
    #[inline]
    pub const fn status_code(&self) -> u16 {
        match self {
            ErrorKind::BadRequest => 400,
            ErrorKind::AuthorizationExpired => 401,
            ErrorKind::AccessDenied => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::RequestTimeout => 408,
            ErrorKind::Conflict => 409,
            ErrorKind::Throttled => 429,
            ErrorKind::Internal => 500,
            ErrorKind::Transport => 502,
            ErrorKind::ServiceUnavailable => 503,
        }
    }

    /// ユーザー向けの文字列表現を取得
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "Bad Request",
            ErrorKind::AuthorizationExpired => "Authorization Expired",
            ErrorKind::AccessDenied => "Access Denied",
            ErrorKind::NotFound => "Not Found",
            ErrorKind::RequestTimeout => "Request Timeout",
            ErrorKind::Conflict => "Conflict",
            ErrorKind::Throttled => "Throttled",
            ErrorKind::Internal => "Internal Error",
            ErrorKind::Transport => "Transport Error",
            ErrorKind::ServiceUnavailable => "Service Unavailable",
        }
    }

    /// 資格情報の更新で回復できるかどうか
    ///
    /// `true` の場合のみ、リクエストディスパッチャは更新と再試行を行います。
    #[inline]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, ErrorKind::AuthorizationExpired)
    }

    /// サーバー側のエラーかどうかを判定
    ///
    /// 5xx系のエラーは `true` を返します。
    #[inline]
    pub const fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    /// クライアント側のエラーかどうかを判定
    #[inline]
    pub const fn is_client_error(&self) -> bool {
        let code = self.status_code();
        code >= 400 && code < 500
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
