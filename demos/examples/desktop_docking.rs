// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A desktop with a dock container, a floating tool window and a popup menu.
//!
//! The demo feeds a scripted sequence of input events through the desktop,
//! runs a geometry pass after each step, and prints where everything ended
//! up. Set `RUST_LOG=debug` to watch focus, drag and dock transitions.
//!
//! Run:
//! - `cargo run -p trellis_demos --example desktop_docking`

use kurbo::{Point, Size};
use tracing_subscriber::EnvFilter;
use trellis_desktop::{Desktop, KeyCombination};
use trellis_dock::{DockContainer, DockZone};
use trellis_widget::events::{
    Key, KeyEvent, Modifiers, MouseButton, MouseButtonEvent, MouseMoveEvent,
};
use trellis_widget::{
    Color, CommandList, DrawOptions, InputFlags, Panel, WidgetId, WidgetProps, WindowRole,
};

const VIEWPORT: Size = Size::new(1024.0, 768.0);

fn props(name: &str, x: f64, y: f64, w: f64, h: f64, color: Color) -> WidgetProps {
    WidgetProps {
        background: Some(color),
        ..WidgetProps::sized(Point::new(x, y), Size::new(w, h)).named(name)
    }
}

fn press(desktop: &mut Desktop, x: f64, y: f64, pressed: bool, timestamp: u64) {
    desktop.mouse_button(&MouseButtonEvent {
        button: MouseButton::Left,
        pressed,
        position: Point::new(x, y),
        modifiers: Modifiers::empty(),
        timestamp,
    });
}

fn move_to(desktop: &mut Desktop, x: f64, y: f64, timestamp: u64) {
    desktop.mouse_move(&MouseMoveEvent {
        position: Point::new(x, y),
        modifiers: Modifiers::empty(),
        timestamp,
    });
}

fn report(desktop: &Desktop, label: &str, widgets: &[(&str, WidgetId)]) {
    println!("-- {label}");
    for (name, id) in widgets {
        let rect = desktop.tree().rect(*id);
        let docked = desktop.tree().dock_container_of(*id).is_some();
        println!("   {name:<10} rect={rect:?} docked={docked}");
    }
    println!("   focus={:?} cursor={:?}", desktop.focus(), desktop.cursor());
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .compact()
        .init();

    let mut desktop = Desktop::new();
    let root = desktop.root();

    let workspace = DockContainer::create(
        desktop.tree_mut(),
        Some(root),
        props("workspace", 0.0, 0.0, 800.0, 768.0, Color::rgba(0.1, 0.1, 0.12, 1.0)),
    );
    let editor = desktop.tree_mut().create(
        props("editor", 0.0, 0.0, 0.0, 0.0, Color::rgba(0.15, 0.15, 0.18, 1.0))
            .dockable()
            .with_input(InputFlags::ALLOW_DRAG),
        Panel,
    );
    let outline = desktop.tree_mut().create(
        props("outline", 0.0, 0.0, 200.0, 0.0, Color::rgba(0.2, 0.2, 0.24, 1.0))
            .dockable()
            .with_input(InputFlags::SHORTCUTS_ALLOWED),
        Panel,
    );
    DockContainer::with(desktop.tree_mut(), workspace, |dock, tree| {
        let leaf = dock.dock().root();
        dock.attach(tree, workspace, editor, leaf, DockZone::Center, 0.5);
        dock.attach(tree, workspace, outline, leaf, DockZone::Left, 0.25);
    });

    let inspector = desktop.insert(
        props("inspector", 820.0, 40.0, 180.0, 300.0, Color::rgba(0.25, 0.22, 0.2, 1.0))
            .dockable()
            .with_window(WindowRole::resizable(24.0)),
        Panel,
    );
    let menu = desktop.tree_mut().create(
        props("menu", 0.0, 0.0, 160.0, 120.0, Color::rgba(0.3, 0.3, 0.3, 1.0)),
        Panel,
    );

    desktop
        .shortcuts_mut()
        .register(KeyCombination::ctrl(Key::Character('q')), || {
            println!("   shortcut: quit requested");
        });

    let widgets = [
        ("editor", editor),
        ("outline", outline),
        ("inspector", inspector),
        ("menu", menu),
    ];
    desktop.update_geometry(VIEWPORT);
    report(&desktop, "initial layout", &widgets);

    // Drag the splitter between outline and editor 100 px to the right.
    press(&mut desktop, 200.0, 300.0, true, 0);
    move_to(&mut desktop, 300.0, 300.0, 16);
    press(&mut desktop, 300.0, 300.0, false, 32);
    desktop.update_geometry(VIEWPORT);
    report(&desktop, "after splitter drag", &widgets);

    // Drag the inspector by its caption onto the right edge of the editor.
    press(&mut desktop, 900.0, 50.0, true, 1_000);
    move_to(&mut desktop, 780.0, 400.0, 1_016);
    desktop.update_geometry(VIEWPORT);
    press(&mut desktop, 780.0, 400.0, false, 1_032);
    desktop.update_geometry(VIEWPORT);
    report(&desktop, "after docking the inspector", &widgets);

    // Open a context menu, then click elsewhere to dismiss it.
    desktop.open_popup(menu, Point::new(400.0, 400.0));
    desktop.update_geometry(VIEWPORT);
    report(&desktop, "menu open", &widgets);
    press(&mut desktop, 100.0, 100.0, true, 2_000);
    press(&mut desktop, 100.0, 100.0, false, 2_010);
    desktop.update_geometry(VIEWPORT);
    report(&desktop, "menu dismissed", &widgets);

    // The outline has focus and lets shortcuts through.
    desktop.key(&KeyEvent {
        key: Key::Character('q'),
        pressed: true,
        modifiers: Modifiers::CTRL,
        timestamp: 3_000,
    });

    let mut canvas = CommandList::new();
    desktop.draw(&mut canvas, &DrawOptions::default());
    tracing::info!(fills = canvas.fills().count(), "frame drawn");
}
