//! Route templates for request spans and metric labels.

use uuid::Uuid;

/// Replace id segments so every cart or order shares one label.
pub(super) fn route_template(path: &str) -> String {
    if path == "/" {
        return "/".to_owned();
    }

    let segments: Vec<&str> = path
        .trim_start_matches('/')
        .split('/')
        .map(|segment| {
            if Uuid::parse_str(segment).is_ok() {
                "{uuid}"
            } else {
                segment
            }
        })
        .collect();

    format!("/{}", segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_segments_are_templated() {
        assert_eq!(
            route_template(
                "/cart/items/0192d3a4-0000-7000-8000-000000000001/0192d3a4-0000-7000-8000-000000000002"
            ),
            "/cart/items/{uuid}/{uuid}"
        );
        assert_eq!(
            route_template("/orders/0192d3a4-0000-7000-8000-000000000003"),
            "/orders/{uuid}"
        );
    }

    #[test]
    fn plain_paths_are_unchanged() {
        assert_eq!(route_template("/"), "/");
        assert_eq!(route_template("/orders/checkout"), "/orders/checkout");
        assert_eq!(route_template("/cart/promo-code"), "/cart/promo-code");
    }
}
