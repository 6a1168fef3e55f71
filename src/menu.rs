//! Header navigation menu
//!
//! Menu data comes from the storefront API. When it is missing the header
//! falls back to a fixed four-entry menu rather than failing.

use crate::error::ChromeError;
use serde::{Deserialize, Serialize};
use url::Url;

/// Hosts that always belong to the shop itself
const SHOPIFY_HOST_MARKER: &str = "myshopify.com";

/// Menu item kind as reported by the storefront API
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MenuItemType {
    Article,
    Blog,
    Catalog,
    Collection,
    Collections,
    Frontpage,
    #[default]
    Http,
    Page,
    Product,
    Search,
    ShopPolicy,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(rename = "type", default)]
    pub item_type: MenuItemType,
    #[serde(default)]
    pub resource_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub items: Vec<MenuItem>,
}

impl MenuItem {
    fn link(id: &str, title: &str, url: &str, item_type: MenuItemType) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            url: Some(url.to_string()),
            item_type,
            resource_id: None,
            tags: Vec::new(),
            items: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Menu {
    pub id: String,
    #[serde(default)]
    pub items: Vec<MenuItem>,
}

impl Menu {
    pub fn from_json(json: &str) -> Result<Self, ChromeError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Menu used when the storefront returns none
    pub fn fallback() -> Self {
        let mut about = MenuItem::link(
            "gid://shopify/MenuItem/461609599032",
            "About",
            "/pages/about",
            MenuItemType::Page,
        );
        about.resource_id = Some("gid://shopify/Page/92591030328".to_string());

        Self {
            id: "gid://shopify/Menu/199655587896".to_string(),
            items: vec![
                MenuItem::link(
                    "gid://shopify/MenuItem/461609500728",
                    "Collections",
                    "/collections",
                    MenuItemType::Http,
                ),
                MenuItem::link(
                    "gid://shopify/MenuItem/461609533496",
                    "Blog",
                    "/blogs/journal",
                    MenuItemType::Http,
                ),
                MenuItem::link(
                    "gid://shopify/MenuItem/461609566264",
                    "Policies",
                    "/policies",
                    MenuItemType::Http,
                ),
                about,
            ],
        }
    }
}

/// Use the provided menu or degrade to [`Menu::fallback`]
pub fn resolve_menu(menu: Option<Menu>) -> Menu {
    menu.unwrap_or_else(|| {
        tracing::debug!("no header menu provided, using fallback");
        Menu::fallback()
    })
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Viewport {
    #[default]
    Desktop,
    Mobile,
}

/// Domains used to decide whether a menu URL points back into the shop
#[derive(Debug, Clone, Default)]
pub struct NavContext {
    pub viewport: Viewport,
    pub public_store_domain: String,
    pub primary_domain_url: String,
}

/// A resolved header link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavLink {
    pub id: String,
    pub title: String,
    pub to: String,
}

/// Build the header's links for a viewport
pub fn nav_links(menu: &Menu, ctx: &NavContext) -> Vec<NavLink> {
    let mut links = Vec::with_capacity(menu.items.len() + 1);

    if ctx.viewport == Viewport::Mobile {
        links.push(NavLink {
            id: "home".to_string(),
            title: "Home".to_string(),
            to: "/".to_string(),
        });
    }

    for item in &menu.items {
        let Some(url) = item.url.as_deref().filter(|u| !u.is_empty()) else {
            continue;
        };

        let to = if is_internal(url, ctx) {
            internal_path(url).unwrap_or_else(|e| {
                tracing::debug!(error = %e, "keeping unparseable menu URL as-is");
                url.to_string()
            })
        } else {
            url.to_string()
        };

        links.push(NavLink {
            id: item.id.clone(),
            title: item.title.clone(),
            to,
        });
    }

    links
}

fn is_internal(url: &str, ctx: &NavContext) -> bool {
    let mentions = |needle: &str| !needle.is_empty() && url.contains(needle);
    url.contains(SHOPIFY_HOST_MARKER)
        || mentions(&ctx.public_store_domain)
        || mentions(&ctx.primary_domain_url)
}

/// Strip scheme and host from an absolute shop URL
pub fn internal_path(url: &str) -> Result<String, ChromeError> {
    let parsed = Url::parse(url).map_err(|e| ChromeError::InvalidUrl(format!("{url}: {e}")))?;
    Ok(parsed.path().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ctx(viewport: Viewport) -> NavContext {
        NavContext {
            viewport,
            public_store_domain: "shop.example.com".to_string(),
            primary_domain_url: "https://www.example.com".to_string(),
        }
    }

    #[test]
    fn test_fallback_menu() {
        let menu = resolve_menu(None);
        let titles: Vec<&str> = menu.items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Collections", "Blog", "Policies", "About"]);
        assert_eq!(menu.items[3].item_type, MenuItemType::Page);
    }

    #[test]
    fn test_resolve_keeps_provided_menu() {
        let menu = Menu {
            id: "m".to_string(),
            items: vec![MenuItem::link("1", "Sale", "/sale", MenuItemType::Http)],
        };
        assert_eq!(resolve_menu(Some(menu.clone())), menu);
    }

    #[test]
    fn test_internal_urls_are_stripped() {
        let menu = Menu {
            id: "m".to_string(),
            items: vec![
                MenuItem::link(
                    "1",
                    "Shirts",
                    "https://acme.myshopify.com/collections/shirts?sort=new",
                    MenuItemType::Collection,
                ),
                MenuItem::link("2", "Store", "https://shop.example.com/pages/store", MenuItemType::Page),
                MenuItem::link("3", "Home", "https://www.example.com/", MenuItemType::Frontpage),
                MenuItem::link("4", "Partner", "https://partner.io/deals", MenuItemType::Http),
            ],
        };

        let links = nav_links(&menu, &ctx(Viewport::Desktop));
        let targets: Vec<&str> = links.iter().map(|l| l.to.as_str()).collect();
        assert_eq!(
            targets,
            vec!["/collections/shirts", "/pages/store", "/", "https://partner.io/deals"]
        );
    }

    #[test]
    fn test_mobile_prepends_home_and_skips_missing_urls() {
        let mut menu = Menu::fallback();
        menu.items[1].url = None;
        menu.items[2].url = Some(String::new());

        let links = nav_links(&menu, &ctx(Viewport::Mobile));
        let titles: Vec<&str> = links.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, vec!["Home", "Collections", "About"]);
        assert_eq!(links[0].to, "/");
    }

    #[test]
    fn test_empty_domains_do_not_match_everything() {
        let links = nav_links(&Menu::fallback(), &NavContext::default());
        assert_eq!(links[0].to, "/collections");
        assert_eq!(links.len(), 4);
    }

    #[test]
    fn test_menu_from_storefront_json() {
        let json = r#"{
            "id": "gid://shopify/Menu/1",
            "items": [
                {"id": "a", "title": "Policies", "type": "SHOP_POLICY", "url": "/policies", "resourceId": null, "tags": [], "items": []},
                {"id": "b", "title": "Lookbook", "type": "METAOBJECT", "url": "/pages/lookbook"}
            ]
        }"#;
        let menu = Menu::from_json(json).unwrap();
        assert_eq!(menu.items[0].item_type, MenuItemType::ShopPolicy);
        assert_eq!(menu.items[1].item_type, MenuItemType::Other);
        assert!(menu.items[1].tags.is_empty());
    }

    #[test]
    fn test_internal_path_rejects_relative() {
        assert!(matches!(internal_path("/pages/about"), Err(ChromeError::InvalidUrl(_))));
    }
}
