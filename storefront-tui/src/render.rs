//! Drawing the storefront from sampled overlay poses.
//!
//! The whole screen is redrawn each frame inside a synchronized update.
//! Surfaces read their openness from [`Pose`]: panels slide or grow with
//! `panel`, children fade and shift in with their own value, and a surface
//! with a backdrop dims everything underneath it.

use std::io::{self, Write};

use crossterm::{
    cursor, queue,
    style::{Attribute, Color, Print, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{BeginSynchronizedUpdate, EndSynchronizedUpdate},
};
use curtain::{Pose, Rect};
use unicode_width::UnicodeWidthChar;

use crate::app::Storefront;
use crate::catalog::{CATEGORIES, MENU, PRODUCTS};
use crate::layout::{BRAND, CATEGORIES_LABEL, Layout, MENU_LABEL, SPECIAL_LABEL};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Rgb(u8, u8, u8);

const SCREEN: Rgb = Rgb(3, 7, 18);
const NAVBAR: Rgb = Rgb(10, 26, 73);
const PANEL: Rgb = Rgb(17, 24, 39);
const BORDER: Rgb = Rgb(55, 65, 81);
const TEXT: Rgb = Rgb(229, 231, 235);
const MUTED: Rgb = Rgb(156, 163, 175);
const ACCENT: Rgb = Rgb(96, 165, 250);
const SHADE: Rgb = Rgb(0, 0, 0);

/// Darkest a backdrop dims the page, as a share of the way to black.
const BACKDROP_DIM: f32 = 0.6;

fn lerp(a: u8, b: u8, t: f32) -> u8 {
    (f32::from(a) + (f32::from(b) - f32::from(a)) * t).round() as u8
}

fn mix(a: Rgb, b: Rgb, t: f32) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    Rgb(lerp(a.0, b.0, t), lerp(a.1, b.1, t), lerp(a.2, b.2, t))
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.0,
        g: rgb.1,
        b: rgb.2,
    }
}

/// Scale `length` by `openness`, clamped to `0..=length`.
fn visible(length: u16, openness: f32) -> u16 {
    (f32::from(length) * openness.clamp(0.0, 1.0)).round() as u16
}

/// Whole-cell offset for an openness, `distance` cells when closed.
fn offset(distance: u16, openness: f32) -> i32 {
    ((1.0 - openness) * f32::from(distance)).round() as i32
}

struct Painter<'a, W: Write> {
    out: &'a mut W,
    /// Page dimming applied to everything painted under a backdrop.
    dim: f32,
}

impl<W: Write> Painter<'_, W> {
    fn shade(&self, rgb: Rgb) -> Color {
        color(mix(rgb, SHADE, self.dim))
    }

    fn fill(&mut self, rect: Rect, bg: Rgb) -> io::Result<()> {
        if rect.is_empty() {
            return Ok(());
        }
        let blank = " ".repeat(rect.width as usize);
        let bg = self.shade(bg);
        queue!(self.out, SetBackgroundColor(bg))?;
        for y in rect.y..rect.bottom() {
            queue!(self.out, cursor::MoveTo(rect.x, y), Print(&blank))?;
        }
        Ok(())
    }

    /// Print `text` starting at column `x` (possibly off-screen to the
    /// left), keeping only the cells inside `clip`.
    fn text(&mut self, x: i32, y: u16, text: &str, clip: Rect, fg: Rgb, bg: Rgb) -> io::Result<()> {
        if y < clip.y || y >= clip.bottom() {
            return Ok(());
        }
        let left = i32::from(clip.x);
        let right = i32::from(clip.right());
        let mut column = x;
        let mut start = None;
        let mut visible = String::new();
        for ch in text.chars() {
            let width = ch.width().unwrap_or(0) as i32;
            if column >= left && column + width <= right {
                start.get_or_insert(column);
                visible.push(ch);
            } else if column >= right {
                break;
            }
            column += width;
        }
        let Some(start) = start else {
            return Ok(());
        };
        let fg = self.shade(fg);
        let bg = self.shade(bg);
        queue!(
            self.out,
            cursor::MoveTo(start as u16, y),
            SetForegroundColor(fg),
            SetBackgroundColor(bg),
            Print(visible)
        )
    }
}

pub fn draw<W: Write>(out: &mut W, app: &Storefront) -> io::Result<()> {
    let overlays = app.overlays();
    let surfaces = app.surfaces();
    let layout = app.layout();

    // Backdrops of mounted surfaces dim the page beneath them.
    let dim = [surfaces.menu, surfaces.special]
        .iter()
        .filter_map(|h| overlays.pose(*h).ok())
        .map(|pose| pose.backdrop * BACKDROP_DIM)
        .fold(0.0_f32, f32::max);

    queue!(out, BeginSynchronizedUpdate, SetAttribute(Attribute::Reset))?;
    let mut painter = Painter { out, dim };

    draw_page(&mut painter, app, layout)?;

    for surface in overlays.mounted_surfaces() {
        let Ok(pose) = overlays.pose(surface) else {
            continue;
        };
        if !pose.is_visible() {
            continue;
        }
        // Surfaces above the page are not dimmed by their own backdrop.
        painter.dim = 0.0;
        if surface == surfaces.menu {
            draw_menu(&mut painter, layout, pose)?;
        } else if surface == surfaces.categories {
            draw_dropdown(&mut painter, layout, pose, app.active_category())?;
        } else if surface == surfaces.special {
            draw_modal(&mut painter, layout, pose)?;
        }
    }

    queue!(painter.out, SetAttribute(Attribute::Reset), EndSynchronizedUpdate)?;
    painter.out.flush()
}

fn draw_page<W: Write>(painter: &mut Painter<'_, W>, app: &Storefront, layout: &Layout) -> io::Result<()> {
    let screen = layout.screen;
    painter.fill(screen, SCREEN)?;

    let navbar = Rect::new(0, 0, screen.width, screen.height.min(1));
    painter.fill(navbar, NAVBAR)?;
    let overlays = app.overlays();
    let surfaces = app.surfaces();
    let triggers = [
        (layout.menu_trigger, MENU_LABEL, surfaces.menu),
        (layout.categories_trigger, CATEGORIES_LABEL, surfaces.categories),
        (layout.special_trigger, SPECIAL_LABEL, surfaces.special),
    ];
    for (rect, label, handle) in triggers {
        let active = overlays.is_mounted(handle).unwrap_or(false);
        let fg = if active { ACCENT } else { TEXT };
        painter.text(i32::from(rect.x) + 1, rect.y, label, screen, fg, NAVBAR)?;
    }
    let brand_x = i32::from(layout.menu_trigger.right()) + 2;
    painter.text(brand_x, 0, BRAND, screen, ACCENT, NAVBAR)?;

    let middle = screen.height / 3;
    painter.text(4, middle, "Handcrafted instruments and festive snacks.", screen, TEXT, SCREEN)?;
    painter.text(
        4,
        middle + 2,
        "Open the menu, browse categories, or peek at the special collection.",
        screen,
        MUTED,
        SCREEN,
    )?;

    let footer = screen.height.saturating_sub(1);
    let hints = format!(
        " q quit · esc dismiss · m/c/s toggle · r reduced motion ({}) · cart: {}",
        if overlays.config().reduced_motion { "on" } else { "off" },
        app.cart_len()
    );
    painter.text(0, footer, &hints, screen, MUTED, SCREEN)?;
    if let Some(status) = app.status() {
        let y = footer.saturating_sub(1);
        painter.text(1, y, status, screen, ACCENT, SCREEN)?;
    }
    Ok(())
}

fn draw_menu<W: Write>(painter: &mut Painter<'_, W>, layout: &Layout, pose: &Pose) -> io::Result<()> {
    let panel = layout.menu_panel;
    let shown = visible(panel.width, pose.panel);
    if shown == 0 {
        return Ok(());
    }
    // The panel slides in from the left edge.
    let clip = Rect::new(panel.x, panel.y, shown, panel.height);
    let shift = i32::from(shown) - i32::from(panel.width);
    let x = |column: u16| i32::from(panel.x + column) + shift;

    painter.fill(clip, PANEL)?;
    painter.text(x(2), panel.y + 1, "Menu", clip, TEXT, PANEL)?;
    let close = layout.menu_close();
    painter.text(x(close.x.saturating_sub(panel.x)), close.y, " ✕ ", clip, MUTED, PANEL)?;

    for (index, item) in MENU.iter().enumerate() {
        let openness = pose.child(index).unwrap_or(0.0);
        if openness <= 0.0 {
            continue;
        }
        let row = layout.menu_item_row(index);
        let fg = mix(PANEL, TEXT, openness);
        painter.text(x(3) - offset(4, openness), row, item.label, clip, fg, PANEL)?;
    }
    Ok(())
}

fn draw_dropdown<W: Write>(
    painter: &mut Painter<'_, W>,
    layout: &Layout,
    pose: &Pose,
    active: usize,
) -> io::Result<()> {
    let panel = layout.dropdown_panel;
    let shown = visible(panel.height, pose.panel);
    if shown == 0 {
        return Ok(());
    }
    // The dropdown unrolls downward from the navbar.
    let clip = Rect::new(panel.x, panel.y, panel.width, shown);
    painter.fill(clip, PANEL)?;
    let left = i32::from(panel.x) + 1;
    painter.text(left, panel.y, "Instrument Categories", clip, MUTED, PANEL)?;

    for (index, category) in CATEGORIES.iter().enumerate() {
        let openness = pose.child(index).unwrap_or(0.0);
        if openness <= 0.0 {
            continue;
        }
        let (marker, base) = if index == active {
            ("›", ACCENT)
        } else {
            (" ", TEXT)
        };
        let label = format!("{} {}", marker, category.title);
        let fg = mix(PANEL, base, openness);
        let row = layout.category_row(index);
        painter.text(left - offset(2, openness), row, &label, clip, fg, PANEL)?;
    }

    let category = &CATEGORIES[active.min(CATEGORIES.len() - 1)];
    let grid_left = i32::from(panel.x + layout.category_column()) + 2;
    let fade = mix(PANEL, TEXT, pose.panel);
    painter.text(grid_left, panel.y + 1, category.title, clip, fade, PANEL)?;
    let cell_width = usize::from(layout.subcategory_width().saturating_sub(1));
    for (index, item) in category.items.iter().enumerate() {
        let (cx, cy) = layout.subcategory_cell(index);
        let label: String = item.chars().take(cell_width).collect();
        painter.text(i32::from(cx), cy, &label, clip, mix(PANEL, MUTED, pose.panel), PANEL)?;
    }
    Ok(())
}

fn draw_modal<W: Write>(painter: &mut Painter<'_, W>, layout: &Layout, pose: &Pose) -> io::Result<()> {
    if pose.panel <= 0.0 {
        return Ok(());
    }
    // The dialog rises into place; an overshoot lifts it briefly above.
    let rise = offset(3, pose.panel);
    let resting = layout.modal_panel;
    let top = (i32::from(resting.y) + rise).clamp(0, i32::from(layout.screen.bottom())) as u16;
    let height = resting.height.min(layout.screen.bottom().saturating_sub(top));
    let panel = Rect::new(resting.x, top, resting.width, height);
    let shift = top as i32 - i32::from(resting.y);
    let row = |y: u16| (i32::from(y) + shift).max(0) as u16;

    painter.fill(panel, PANEL)?;
    let border = mix(PANEL, BORDER, pose.panel);
    let rule = "─".repeat(panel.width as usize);
    painter.text(i32::from(panel.x), row(resting.y + 2), &rule, panel, border, PANEL)?;

    let title = mix(PANEL, TEXT, pose.panel);
    let left = i32::from(panel.x) + 2;
    painter.text(left, panel.y + 1, "Special Makhana Collection", panel, title, PANEL)?;
    let close = layout.modal_close();
    painter.text(i32::from(close.x), row(close.y), "[x]", panel, mix(PANEL, MUTED, pose.panel), PANEL)?;

    for (index, product) in PRODUCTS.iter().enumerate() {
        let openness = pose.child(index).unwrap_or(0.0);
        if openness <= 0.0 {
            continue;
        }
        let y = (i32::from(row(layout.product_row(index))) + offset(1, openness)).max(0) as u16;
        let heading = format!("{}  {} · {}", product.name, product.price, product.weight);
        painter.text(left, y, &heading, panel, mix(PANEL, TEXT, openness), PANEL)?;
        painter.text(left, y + 1, product.description, panel, mix(PANEL, MUTED, openness), PANEL)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mix_endpoints() {
        assert_eq!(mix(PANEL, TEXT, 0.0), PANEL);
        assert_eq!(mix(PANEL, TEXT, 1.0), TEXT);
        assert_eq!(mix(PANEL, TEXT, 4.0), TEXT);
    }

    #[test]
    fn visible_clamps_overshoot() {
        assert_eq!(visible(30, 0.5), 15);
        assert_eq!(visible(30, 1.2), 30);
        assert_eq!(visible(30, -0.1), 0);
    }

    #[test]
    fn offsets_shrink_as_surface_opens() {
        assert_eq!(offset(4, 0.0), 4);
        assert_eq!(offset(4, 1.0), 0);
        assert_eq!(offset(3, 1.2), -1);
    }

    #[test]
    fn text_is_clipped_to_region() {
        let mut out = Vec::new();
        let mut painter = Painter { out: &mut out, dim: 0.0 };
        let clip = Rect::new(2, 0, 3, 1);
        painter.text(0, 0, "abcdefg", clip, TEXT, PANEL).unwrap();
        let written = String::from_utf8(out).unwrap();
        assert!(written.ends_with("cde"), "{:?}", written);
    }
}
