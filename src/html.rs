use crate::calendar::{DayCell, MonthView};
use crate::menu::MenuEntry;
use maud::{html, Markup, PreEscaped, DOCTYPE};

/// Markup for one month of the academic-year calendar
pub(crate) fn month(view: &MonthView) -> Markup {
    html! {
        div.calendar {
            div.calendar-nav.navbar {
                div.navbar-primary { (view.title) }
            }
            div.calendar-header {
                @for label in &view.header {
                    div.calendar-date { (label) }
                }
            }
            div.calendar-body {
                @for cell in &view.days {
                    (day(cell))
                }
            }
        }
    }
}

fn day(cell: &DayCell) -> Markup {
    let mut classes = vec![String::from("calendar-date")];
    classes.extend(cell.classes());
    let week_id = cell.week_id.map(|id| id.to_string()).unwrap_or_default();
    html! {
        div class=(classes.join(" "))
            data-date=(cell.date)
            data-weekstarts=(cell.week_start)
            data-ui="calendar_date"
            data-weekid=(week_id)
        {
            button.date-item.badge[cell.holiday]
                type="button"
                data-ui="calendar_date_btn"
                disabled[cell.disabled]
            {
                (cell.day())
            }
            input type="hidden" name={ "dates[" (cell.date) "]" } value=(week_id);
        }
    }
}

/// Navigation list of the entries flagged visible
pub(crate) fn nav(entries: &[MenuEntry]) -> Markup {
    html! {
        ul.nav {
            @for entry in entries.iter().filter(|e| e.visible) {
                li {
                    a href={ "/" (entry.url) }
                        data-icon=(entry.icon)
                        data-method=[entry.link_attrs.and_then(|a| a.method)]
                    {
                        (entry.label)
                    }
                }
            }
        }
    }
}

/// A standalone page with both menus, every month of the year and the week
/// range stylesheet
pub(crate) fn page(
    main_menu: &[MenuEntry],
    user_menu: &[MenuEntry],
    months: &[MonthView],
    css: &str,
) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                title { "Academic year" }
                style { (PreEscaped(css)) }
            }
            body {
                header.navbar {
                    nav.navbar-primary { (nav(main_menu)) }
                    nav.navbar-secondary { (nav(user_menu)) }
                }
                main.calendars {
                    @for m in months {
                        (month(m))
                    }
                }
            }
        }
    }
}
