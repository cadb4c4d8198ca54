//! Provider-specific page planning and full-listing enumeration.
use tokio_util::sync::CancellationToken;

use crate::core::{
    dispatcher::CallDispatcher,
    model::{CallDescriptor, CallResult, CloudCredential},
    provider::{PaginationStyle, profile_for},
};

/// One planned page: the descriptor to send and the page size it asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagePlan {
    pub descriptor: CallDescriptor,
    pub page_size: usize,
}

/// Plan page `page_index` of a listing.
///
/// `page_index` is passed to the provider's numbering unmodified; callers
/// supply the base their provider expects (see
/// [`ProviderProfile::first_page`](crate::core::provider::ProviderProfile)).
/// Returns `None` when the provider has no paging support, which callers
/// treat as a single-page result, or when the page's offset does not fit in
/// a `usize`.
pub fn plan_page(
    provider: &str,
    service: &str,
    region: &str,
    action: &str,
    credential: &CloudCredential,
    page_index: usize,
) -> Option<PagePlan> {
    let mut descriptor =
        CallDescriptor::new(provider, service, action, region, credential.clone());

    let page_size = match profile_for(provider).pagination {
        PaginationStyle::Unsupported => return None,
        PaginationStyle::LimitOffset {
            page_size,
            limit_key,
            offset_key,
        } => {
            let Some(offset) = page_index.checked_mul(page_size) else {
                tracing::warn!(provider, page_index, "page offset overflows, no page planned");
                return None;
            };
            descriptor
                .parameters
                .insert(limit_key.to_string(), page_size.to_string());
            descriptor
                .parameters
                .insert(offset_key.to_string(), offset.to_string());
            page_size
        }
        PaginationStyle::PageNumber {
            page_size,
            number_key,
            size_key,
        } => {
            descriptor
                .parameters
                .insert(number_key.to_string(), page_index.to_string());
            descriptor
                .parameters
                .insert(size_key.to_string(), page_size.to_string());
            page_size
        }
    };

    Some(PagePlan {
        descriptor,
        page_size,
    })
}

/// Fetch every page of a listing described by `template`.
///
/// Starts at the provider's native first page and keeps going until a page
/// holds fewer than `page_size` items (as counted by `count_items`), the
/// provider does not page, `max_pages` pages were fetched, or a page fails.
/// Template parameters are sent with every page; paging keys win on clash.
/// On failure the failed page's result is returned.
pub async fn enumerate_pages<F>(
    dispatcher: &CallDispatcher,
    template: &CallDescriptor,
    max_pages: usize,
    cancel: &CancellationToken,
    count_items: F,
) -> Result<Vec<String>, CallResult>
where
    F: Fn(&str) -> usize,
{
    let profile = profile_for(&template.provider);
    let mut pages = Vec::new();
    let mut page_index = profile.first_page;

    while pages.len() < max_pages.max(1) {
        let Some(plan) = plan_page(
            &template.provider,
            &template.service,
            &template.region,
            &template.action,
            &template.credential,
            page_index,
        ) else {
            let result = dispatcher.dispatch(template, cancel).await;
            return if result.is_success() {
                Ok(vec![result.data])
            } else {
                Err(result)
            };
        };

        let mut descriptor = plan.descriptor;
        for (key, value) in &template.parameters {
            descriptor
                .parameters
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }

        let result = dispatcher.dispatch(&descriptor, cancel).await;
        if !result.is_success() {
            tracing::warn!(
                provider = %template.provider,
                page_index,
                code = result.code,
                "page fetch failed, stopping enumeration"
            );
            return Err(result);
        }

        let items = count_items(&result.data);
        pages.push(result.data);
        tracing::debug!(provider = %template.provider, page_index, items, "fetched page");
        if items < plan.page_size {
            break;
        }
        page_index += 1;
    }

    Ok(pages)
}
