use std::rc::Rc;

use fltk::{
    app,
    button::{Button, CheckButton},
    frame::Frame,
    group::Flex,
    menu::Choice,
    prelude::*,
    window::Window,
};
use tracing_subscriber::EnvFilter;

use style_helper::StyleContext;
use style_helper::StyleSettings;
use style_helper::ui::{FltkPalette, PollTimer, set_widget_style, style_names, window_handle};

fn scheme_label(is_dark: bool) -> &'static str {
    if is_dark {
        "Palette: dark"
    } else {
        "Palette: light"
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let settings = StyleSettings::load();
    let app = app::App::default();
    if let Some(style) = &settings.widget_style {
        set_widget_style(style);
    }

    let context = Rc::new(StyleContext::detect(settings, Box::new(FltkPalette::new())));

    let mut wind = Window::new(100, 100, 420, 180, "stylehelper");
    let mut flex = Flex::new(10, 10, 400, 160, None);
    flex.set_type(fltk::group::FlexType::Column);

    let mut status = Frame::default();
    let mut follow = CheckButton::default().with_label("Follow system theme");
    let mut toggle = Button::default().with_label("Toggle light/dark");
    let mut styles = Choice::default();
    for name in style_names() {
        styles.add_choice(name);
    }
    flex.fixed(&styles, 30);

    flex.end();
    wind.resizable(&flex);
    wind.end();
    wind.show();

    // Chrome can only be applied once the window has a native handle
    let is_dark = context.observer().sample();
    context.palette().borrow_mut().set_palette(is_dark);
    context.refresh_windows(&[window_handle(&wind)], is_dark);
    status.set_label(scheme_label(is_dark));
    follow.set_checked(context.palette().borrow().auto_change_palette());

    {
        let ctx = Rc::downgrade(&context);
        let wind = wind.clone();
        let mut status = status.clone();
        context.observer().subscribe(move |is_dark| {
            let Some(ctx) = ctx.upgrade() else { return };
            if ctx.palette().borrow().auto_change_palette() {
                ctx.refresh_windows(&[window_handle(&wind)], is_dark);
                status.set_label(scheme_label(is_dark));
            }
        });
    }

    let ctx = context.clone();
    follow.set_callback(move |b| {
        ctx.palette()
            .borrow_mut()
            .set_auto_change_palette(b.is_checked());
    });

    let ctx = context.clone();
    let wind_toggle = wind.clone();
    let mut status_toggle = status.clone();
    toggle.set_callback(move |_| {
        let dark = !ctx.palette().borrow().current_is_dark();
        ctx.palette().borrow_mut().set_palette(dark);
        ctx.refresh_windows(&[window_handle(&wind_toggle)], dark);
        status_toggle.set_label(scheme_label(dark));
    });

    styles.set_callback(|c| {
        if let Some(name) = c.choice() {
            set_widget_style(&name);
        }
    });

    let _poll = PollTimer::start(context.observer());

    if let Err(e) = app.run() {
        tracing::error!("event loop failed: {}", e);
    }
}
