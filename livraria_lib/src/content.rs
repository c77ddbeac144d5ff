//! Fixups for descriptive HTML stored in catalog records.
//!
//! Product pages are scraped with `srcset` attributes and absolute image
//! URLs pointing at the source site. The storefront serves everything from
//! `/images/`, so stored `catalogContent` HTML gets rewritten: `srcset`
//! dropped, external image URLs swapped for the record's own downloaded
//! copies (matched by file name, with size-variant suffixes like
//! `-300x169` or `-scaled` normalized away).

use std::collections::HashMap;

use regex::Regex;
use serde_json::Value;

use crate::catalog::Product;
use crate::error::LivrariaError;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ContentChanges {
    pub srcset_removed: usize,
    pub urls_rewritten: usize,
}

impl ContentChanges {
    pub fn total(&self) -> usize {
        self.srcset_removed + self.urls_rewritten
    }
}

fn compile(pattern: &str) -> Result<Regex, LivrariaError> {
    Regex::new(pattern)
        .map_err(|e| LivrariaError::InvalidInput(format!("regex compile error: {}", e)))
}

/// Drop every `srcset` attribute, leaving `src` as the single source.
pub fn strip_srcset(html: &str) -> Result<(String, usize), LivrariaError> {
    let re = compile(r#"\s+srcset\s*=\s*("[^"]*"|'[^']*')"#)?;
    let count = re.find_iter(html).count();
    if count == 0 {
        return Ok((html.to_string(), 0));
    }
    Ok((re.replace_all(html, "").into_owned(), count))
}

/// Strip size-variant suffixes a CMS appends to image file names.
fn canonical_file_name(name: &str) -> Result<String, LivrariaError> {
    let mut canonical = name.to_string();
    for pattern in [r"-\d+x\d+\.", r"-\d+w\.", r"-scaled\."] {
        canonical = compile(pattern)?.replace_all(&canonical, ".").into_owned();
    }
    Ok(canonical)
}

/// The importer prefixes downloaded files with `kind_sku_index_`; the
/// original file name is what matches against scraped URLs.
fn original_file_name(local: &str) -> Result<String, LivrariaError> {
    let file = local.rsplit('/').next().unwrap_or(local);
    Ok(compile(r"^(?:catalog|internal|cover)_\d+_\d+_")?
        .replace(file, "")
        .into_owned())
}

/// Replace absolute image URLs in `html` with local paths from
/// `local_images`, matching on canonical file names. URLs with no local
/// counterpart are left as they are.
pub fn rewrite_image_urls(
    html: &str,
    local_images: &[String],
) -> Result<(String, usize), LivrariaError> {
    let mut by_name: HashMap<String, &str> = HashMap::new();
    for local in local_images {
        if local.starts_with('/') {
            by_name.insert(original_file_name(local)?, local.as_str());
        }
    }
    if by_name.is_empty() {
        return Ok((html.to_string(), 0));
    }

    let url_re = compile(r#"(?i)https?://[^\s"'<>]+\.(?:png|jpe?g|gif|webp)"#)?;
    let mut rewritten = 0;
    let replaced = url_re.replace_all(html, |caps: &regex::Captures<'_>| {
        let url = &caps[0];
        let canonical = match canonical_file_name(url) {
            Ok(c) => c,
            Err(_) => return url.to_string(),
        };
        let name = canonical.rsplit('/').next().unwrap_or(&canonical);
        match by_name.get(name) {
            Some(local) => {
                rewritten += 1;
                (*local).to_string()
            }
            None => url.to_string(),
        }
    });
    Ok((replaced.into_owned(), rewritten))
}

fn local_images_of(product: &Product) -> Vec<String> {
    let mut images = Vec::new();
    if let Some(image) = product.image.as_deref().filter(|i| i.starts_with('/')) {
        images.push(image.to_string());
    }
    for key in ["images", "catalogImages"] {
        if let Some(Value::Array(values)) = product.extra.get(key) {
            for value in values {
                if let Some(path) = value.as_str().filter(|p| p.starts_with('/')) {
                    images.push(path.to_string());
                }
            }
        }
    }
    images
}

/// Apply both fixups to a record's stored `catalogContent` HTML.
pub fn fix_product_content(product: &mut Product) -> Result<ContentChanges, LivrariaError> {
    let html = match product.extra.get("catalogContent").and_then(Value::as_str) {
        Some(html) if !html.is_empty() => html.to_string(),
        _ => return Ok(ContentChanges::default()),
    };

    let (html, srcset_removed) = strip_srcset(&html)?;
    let locals = local_images_of(product);
    let (html, urls_rewritten) = rewrite_image_urls(&html, &locals)?;

    let changes = ContentChanges {
        srcset_removed,
        urls_rewritten,
    };
    if changes.total() > 0 {
        product
            .extra
            .insert("catalogContent".into(), Value::String(html));
    }
    Ok(changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strip_srcset() {
        let html = r#"<img src="/images/a.png" srcset="/a-300.png 300w, /a-600.png 600w"><img src="/images/b.png">"#;
        let (out, count) = strip_srcset(html).unwrap();
        assert_eq!(count, 1);
        assert_eq!(out, r#"<img src="/images/a.png"><img src="/images/b.png">"#);
    }

    #[test]
    fn test_rewrite_known_external_url() {
        let locals = vec!["/images/catalog_9786561190626_0_IMG_CATA1.png".to_string()];
        let html = r#"<img src="https://n-1edicoes.org/wp-content/uploads/2026/01/IMG_CATA1.png">"#;
        let (out, count) = rewrite_image_urls(html, &locals).unwrap();
        assert_eq!(count, 1);
        assert_eq!(
            out,
            r#"<img src="/images/catalog_9786561190626_0_IMG_CATA1.png">"#
        );
    }

    #[test]
    fn test_rewrite_normalizes_size_variants() {
        let locals = vec!["/images/catalog_123_1_IMG_CATA2.jpg".to_string()];
        let html = r#"<img src="https://n-1edicoes.org/uploads/IMG_CATA2-300x169.jpg">"#;
        let (out, count) = rewrite_image_urls(html, &locals).unwrap();
        assert_eq!(count, 1);
        assert!(out.contains("/images/catalog_123_1_IMG_CATA2.jpg"));
    }

    #[test]
    fn test_unknown_urls_left_alone() {
        let locals = vec!["/images/catalog_123_0_other.png".to_string()];
        let html = r#"<img src="https://n-1edicoes.org/uploads/unrelated.png">"#;
        let (out, count) = rewrite_image_urls(html, &locals).unwrap();
        assert_eq!(count, 0);
        assert_eq!(out, html);
    }

    #[test]
    fn test_fix_product_content() {
        let mut product = Product::new("Mil platôs");
        product
            .extra
            .insert("catalogImages".into(), json!(["/images/catalog_111_0_foto.png"]));
        product.extra.insert(
            "catalogContent".into(),
            json!(r#"<img src="https://n-1edicoes.org/up/foto-scaled.png" srcset="x 300w">"#),
        );

        let changes = fix_product_content(&mut product).unwrap();
        assert_eq!(changes.srcset_removed, 1);
        assert_eq!(changes.urls_rewritten, 1);
        let html = product.extra["catalogContent"].as_str().unwrap();
        assert!(html.contains("/images/catalog_111_0_foto.png"));
        assert!(!html.contains("srcset"));
    }

    #[test]
    fn test_record_without_content_is_untouched() {
        let mut product = Product::new("Mil platôs");
        let changes = fix_product_content(&mut product).unwrap();
        assert_eq!(changes, ContentChanges::default());
    }
}
