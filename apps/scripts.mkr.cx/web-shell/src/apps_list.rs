//! Markup for the deployed-apps listing.

use scripts_client_core::AppRecord;

const EMPTY_LISTING: &str = "<p class=\"apps-empty\">No apps deployed yet.</p>";

pub(crate) fn render_apps_list(apps: &[AppRecord], app_domain: &str) -> String {
    if apps.is_empty() {
        return EMPTY_LISTING.to_string();
    }
    apps.iter()
        .map(|app| render_app_item(app, app_domain))
        .collect::<Vec<_>>()
        .join("")
}

fn render_app_item(app: &AppRecord, app_domain: &str) -> String {
    let url = app.public_url(app_domain);
    let host = format!("{}.{app_domain}", app.subdomain);
    format!(
        "<div class=\"app-item\"><h3>{}</h3><p>Image: {}</p><p>URL: <a href=\"{}\" target=\"_blank\" rel=\"noopener\">{}</a></p></div>",
        html_escape::encode_text(&app.project_name),
        html_escape::encode_text(&app.container_image),
        html_escape::encode_double_quoted_attribute(&url),
        html_escape::encode_text(&host),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(project_name: &str, subdomain: &str, image: &str) -> AppRecord {
        AppRecord {
            project_name: project_name.to_string(),
            subdomain: subdomain.to_string(),
            container_image: image.to_string(),
        }
    }

    #[test]
    fn empty_listing_renders_placeholder() {
        assert_eq!(render_apps_list(&[], "scripts.mkr.cx"), EMPTY_LISTING);
    }

    #[test]
    fn items_link_to_public_subdomain() {
        let html = render_apps_list(&[app("api", "api-demo", "nginx:1.27")], "scripts.mkr.cx");

        assert!(html.contains("<h3>api</h3>"));
        assert!(html.contains("Image: nginx:1.27"));
        assert!(html.contains("href=\"https://api-demo.scripts.mkr.cx\""));
        assert!(html.contains(">api-demo.scripts.mkr.cx</a>"));
    }

    #[test]
    fn server_values_are_escaped() {
        let html = render_apps_list(
            &[app("<script>alert(1)</script>", "x\"y", "a&b")],
            "scripts.mkr.cx",
        );

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("href=\"https://x&quot;y.scripts.mkr.cx\""));
        assert!(html.contains("Image: a&amp;b"));
    }

    #[test]
    fn items_render_in_server_order() {
        let html = render_apps_list(
            &[app("first", "one", "img"), app("second", "two", "img")],
            "example.test",
        );
        let first = html.find("first").expect("first item");
        let second = html.find("second").expect("second item");
        assert!(first < second);
    }
}
