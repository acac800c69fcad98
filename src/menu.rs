use crate::lang::{Lang, LOG_OUT_KEY};
use serde::Serialize;

/// Anything that can say whether the current visitor is signed in
pub(crate) trait Session {
    fn logged_in(&self) -> bool;
}

impl Session for bool {
    fn logged_in(&self) -> bool {
        *self
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub(crate) struct MenuEntry {
    pub(crate) label: String,
    pub(crate) url: &'static str,
    pub(crate) icon: &'static str,
    /// Advice to the navigation renderer; hidden entries are still returned
    pub(crate) visible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) link_attrs: Option<LinkAttrs>,
}

/// Extra attributes for an entry's link
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub(crate) struct LinkAttrs {
    /// HTTP method the link should be followed with
    #[serde(rename = "data-method", skip_serializing_if = "Option::is_none")]
    pub(crate) method: Option<&'static str>,
}

impl MenuEntry {
    fn new<S: Into<String>>(
        label: S,
        url: &'static str,
        icon: &'static str,
        visible: bool,
    ) -> Self {
        MenuEntry {
            label: label.into(),
            url,
            icon,
            visible,
            link_attrs: None,
        }
    }

    fn method(mut self, method: &'static str) -> Self {
        self.link_attrs.get_or_insert_with(LinkAttrs::default).method = Some(method);
        self
    }
}

/// The application's navigation menus for one visitor
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Menus {
    logged_in: bool,
}

impl Menus {
    pub(crate) fn new(logged_in: bool) -> Menus {
        Menus { logged_in }
    }

    pub(crate) fn for_session<S: Session>(session: &S) -> Menus {
        Menus::new(session.logged_in())
    }

    pub(crate) fn user_menu<L: Lang>(&self, lang: L) -> Vec<MenuEntry> {
        vec![
            MenuEntry::new("Account", "user", "user", self.logged_in),
            MenuEntry::new(lang.text(LOG_OUT_KEY), "user/logout", "log-out", self.logged_in)
                .method("post"),
        ]
    }

    pub(crate) fn main_menu(&self) -> Vec<MenuEntry> {
        vec![
            MenuEntry::new("Dashboard", "dashboard", "home", self.logged_in),
            MenuEntry::new("Bookings", "bookings", "check-square", self.logged_in),
            MenuEntry::new("Settings", "settings", "settings", self.logged_in),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::English;

    #[test]
    fn test_visibility_follows_login() {
        for logged_in in [false, true] {
            let menus = Menus::for_session(&logged_in);
            let user = menus.user_menu(English);
            let main = menus.main_menu();
            assert_eq!(user.len(), 2);
            assert_eq!(main.len(), 3);
            assert!(user.iter().chain(&main).all(|e| e.visible == logged_in));
        }
    }

    #[test]
    fn test_user_menu() {
        let user = Menus::new(true).user_menu(English);
        assert_eq!(user[0].label, "Account");
        assert_eq!(user[0].url, "user");
        assert_eq!(user[0].link_attrs, None);
        assert_eq!(user[1].label, "Log out");
        assert_eq!(user[1].url, "user/logout");
        assert_eq!(user[1].icon, "log-out");
        assert_eq!(
            user[1].link_attrs,
            Some(LinkAttrs {
                method: Some("post")
            })
        );
    }

    #[test]
    fn test_main_menu_order() {
        let main = Menus::new(false).main_menu();
        let labels = main.iter().map(|e| e.label.as_str()).collect::<Vec<_>>();
        assert_eq!(labels, ["Dashboard", "Bookings", "Settings"]);
        let urls = main.iter().map(|e| e.url).collect::<Vec<_>>();
        assert_eq!(urls, ["dashboard", "bookings", "settings"]);
    }

    #[test]
    fn test_serialize() {
        let user = Menus::new(false).user_menu(English);
        let v = serde_json::to_value(&user).unwrap();
        assert_eq!(
            v,
            serde_json::json!([
                {"label": "Account", "url": "user", "icon": "user", "visible": false},
                {
                    "label": "Log out",
                    "url": "user/logout",
                    "icon": "log-out",
                    "visible": false,
                    "link_attrs": {"data-method": "post"}
                }
            ])
        );
    }
}
