//! Centralized Error Handling Module
//!
//! Every failure carries a unique error code so callers can branch on it
//! and logs stay greppable.
//!
//! Error codes follow pattern: CATEGORY_SPECIFIC_ERROR
//! - CODEC_xxx: felt/word/address decoding errors
//! - PRESWAP_xxx: routing and execution errors
//! - RPC_xxx / TX_xxx: chain I/O errors
//! - CFG_xxx: Configuration errors

use std::fmt;

/// Application-wide error type
#[derive(Debug)]
pub struct AppError {
    /// Unique error code for logging/monitoring
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Optional underlying error
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new AppError
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create AppError with source error
    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Get error code as string (for logging)
    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Unique error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // ============================================
    // Codec Errors
    // ============================================
    /// Input is not valid hexadecimal
    InvalidFormat,
    /// Decoded byte count does not match the expected width
    InvalidLength,
    /// Address fails format or checksum validation
    InvalidAddress,

    // ============================================
    // Preswap Errors
    // ============================================
    /// No registered provider serves the chain
    NoProvider,
    /// Request or route targets a different chain than the provider
    ChainMismatch,
    /// Execution attempted without a signer
    MissingSigner,
    /// Quote is past its validity window
    QuoteExpired,
    /// Route was not produced by this provider
    InvalidRoute,
    /// Pool cannot satisfy the requested output
    InsufficientLiquidity,
    /// Pricing arithmetic overflowed
    MathOverflow,

    // ============================================
    // RPC / Transaction Errors
    // ============================================
    /// RPC returned error response
    RpcError,
    /// RPC request timeout
    RpcTimeout,
    /// Transaction reverted or never confirmed
    TxFailed,

    // ============================================
    // Configuration Errors
    // ============================================
    /// Missing environment variable
    ConfigMissingEnv,
    /// Invalid configuration value
    ConfigInvalidValue,
    /// Unsupported chain ID
    ConfigUnsupportedChain,

    // ============================================
    // Generic Errors
    // ============================================
    /// Unknown error
    Unknown,
}

impl ErrorCode {
    /// Get string representation of error code
    pub fn as_str(&self) -> &'static str {
        match self {
            // Codec Errors
            Self::InvalidFormat => "CODEC_INVALID_FORMAT",
            Self::InvalidLength => "CODEC_INVALID_LENGTH",
            Self::InvalidAddress => "CODEC_INVALID_ADDRESS",

            // Preswap Errors
            Self::NoProvider => "PRESWAP_NO_PROVIDER",
            Self::ChainMismatch => "PRESWAP_CHAIN_MISMATCH",
            Self::MissingSigner => "PRESWAP_MISSING_SIGNER",
            Self::QuoteExpired => "PRESWAP_QUOTE_EXPIRED",
            Self::InvalidRoute => "PRESWAP_INVALID_ROUTE",
            Self::InsufficientLiquidity => "PRESWAP_INSUFFICIENT_LIQUIDITY",
            Self::MathOverflow => "PRESWAP_MATH_OVERFLOW",

            // RPC / Transaction Errors
            Self::RpcError => "RPC_ERROR",
            Self::RpcTimeout => "RPC_TIMEOUT",
            Self::TxFailed => "TX_FAILED",

            // Configuration Errors
            Self::ConfigMissingEnv => "CFG_MISSING_ENV",
            Self::ConfigInvalidValue => "CFG_INVALID_VALUE",
            Self::ConfigUnsupportedChain => "CFG_UNSUPPORTED_CHAIN",

            // Generic
            Self::Unknown => "UNKNOWN_ERROR",
        }
    }

    /// Check if error is retryable.
    /// Only read-side RPC failures qualify; preswap failures are final.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RpcTimeout | Self::RpcError)
    }
}

// ============================================
// Convenience constructors
// ============================================

impl AppError {
    /// Malformed hex input
    pub fn invalid_format(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidFormat, msg)
    }

    /// Wrong decoded byte count
    pub fn invalid_length(expected: usize, actual: usize) -> Self {
        Self::new(
            ErrorCode::InvalidLength,
            format!("expected {} bytes, got {}", expected, actual),
        )
    }

    /// Invalid EVM address
    pub fn invalid_address(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidAddress, msg)
    }

    /// No provider for a chain
    pub fn no_provider(chain_id: u64) -> Self {
        Self::new(
            ErrorCode::NoProvider,
            format!("No providers found for chain {}", chain_id),
        )
    }

    /// Chain id mismatch between request and provider
    pub fn chain_mismatch(expected: u64, actual: u64) -> Self {
        Self::new(
            ErrorCode::ChainMismatch,
            format!("provider serves chain {}, got {}", expected, actual),
        )
    }

    /// Missing signer
    pub fn missing_signer() -> Self {
        Self::new(ErrorCode::MissingSigner, "No signer configured")
    }

    /// Quote expired
    pub fn quote_expired() -> Self {
        Self::new(ErrorCode::QuoteExpired, "Quote expired")
    }

    /// Route not owned by the provider
    pub fn invalid_route(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRoute, msg)
    }

    /// Pool cannot fill the order
    pub fn insufficient_liquidity(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InsufficientLiquidity, msg)
    }

    /// Arithmetic overflow
    pub fn math_overflow(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::MathOverflow, msg)
    }

    /// Transaction failed
    pub fn tx_failed(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::TxFailed, msg)
    }

    /// Missing environment variable
    pub fn missing_env(key_name: &str) -> Self {
        Self::new(
            ErrorCode::ConfigMissingEnv,
            format!("Missing environment variable: {}", key_name),
        )
    }

    /// Invalid configuration value
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigInvalidValue, msg)
    }

    /// Unsupported chain
    pub fn unsupported_chain(chain_id: u64) -> Self {
        Self::new(
            ErrorCode::ConfigUnsupportedChain,
            format!("Unsupported chain_id: {}", chain_id),
        )
    }
}

// ============================================
// Result type alias
// ============================================

/// Application Result type
pub type AppResult<T> = Result<T, AppError>;

// ============================================
// Conversion from common error types
// ============================================

impl From<alloy::transports::TransportError> for AppError {
    fn from(err: alloy::transports::TransportError) -> Self {
        let msg = err.to_string();
        if msg.to_lowercase().contains("timed out") {
            Self::with_source(ErrorCode::RpcTimeout, "RPC timeout", err)
        } else {
            Self::with_source(ErrorCode::RpcError, msg, err)
        }
    }
}

impl From<alloy::contract::Error> for AppError {
    fn from(err: alloy::contract::Error) -> Self {
        match err {
            alloy::contract::Error::TransportError(e) => e.into(),
            other => Self::with_source(ErrorCode::RpcError, "Contract call failed", other),
        }
    }
}

impl From<alloy::providers::PendingTransactionError> for AppError {
    fn from(err: alloy::providers::PendingTransactionError) -> Self {
        Self::with_source(ErrorCode::TxFailed, "Transaction not confirmed", err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(ErrorCode::InvalidFormat, "JSON parse error", err)
    }
}
