//! Closed table of provider-specific policy.
//!
//! Everything that differs between providers (pagination parameter names,
//! the native page numbering base, the raw-mode response encoding) lives in
//! [`PROVIDERS`]. Adding a provider is one new row.

/// Encoding of a successful response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireFormat {
    Json,
    Xml,
}

impl WireFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            WireFormat::Json => "application/json",
            WireFormat::Xml => "application/xml",
        }
    }
}

/// How a provider's list APIs express paging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationStyle {
    /// Listing is not paged through the gateway.
    Unsupported,
    /// `limit=<size>`, `offset=<index * size>`
    LimitOffset {
        page_size: usize,
        limit_key: &'static str,
        offset_key: &'static str,
    },
    /// `pageNumber=<index>`, `pageSize=<size>`
    PageNumber {
        page_size: usize,
        number_key: &'static str,
        size_key: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderProfile {
    pub name: &'static str,
    pub pagination: PaginationStyle,
    /// Format of a successful raw-mode body
    pub raw_format: WireFormat,
    /// Index of the first page in the provider's native numbering
    pub first_page: usize,
}

pub const PROVIDERS: &[ProviderProfile] = &[
    ProviderProfile {
        name: "qcloud",
        pagination: PaginationStyle::LimitOffset {
            page_size: 100,
            limit_key: "limit",
            offset_key: "offset",
        },
        raw_format: WireFormat::Json,
        first_page: 0,
    },
    ProviderProfile {
        name: "aliyun",
        pagination: PaginationStyle::PageNumber {
            page_size: 100,
            number_key: "pageNumber",
            size_key: "pageSize",
        },
        raw_format: WireFormat::Json,
        first_page: 1,
    },
    ProviderProfile {
        name: "aws",
        pagination: PaginationStyle::Unsupported,
        raw_format: WireFormat::Xml,
        first_page: 0,
    },
];

static FALLBACK: ProviderProfile = ProviderProfile {
    name: "",
    pagination: PaginationStyle::Unsupported,
    raw_format: WireFormat::Json,
    first_page: 0,
};

/// Profile for `provider`; unknown providers get JSON and no paging.
pub fn profile_for(provider: &str) -> &'static ProviderProfile {
    PROVIDERS
        .iter()
        .find(|profile| profile.name == provider)
        .unwrap_or(&FALLBACK)
}
