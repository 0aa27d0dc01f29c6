//! Storefront state and input routing.
//!
//! Each overlay of the page is one `curtain` surface. Pointer input goes to
//! the controller's dismissal first, then to whatever open surface was hit,
//! and only then to the navbar triggers.

use std::time::Instant;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEventKind};
use curtain::{
    FrameQueue, OverlayConfig, OverlayError, OverlaySpec, Overlays, PointerEvent, SurfaceHandle,
};
use log::{debug, info, trace};

use crate::catalog::{self, CATEGORIES, MENU, MenuTarget, PRODUCTS};
use crate::layout::{Layout, Trigger};

/// Handles of the page's three overlays.
#[derive(Debug, Clone, Copy)]
pub struct Surfaces {
    pub menu: SurfaceHandle,
    pub categories: SurfaceHandle,
    pub special: SurfaceHandle,
}

pub struct Storefront {
    overlays: Overlays<FrameQueue>,
    surfaces: Surfaces,
    layout: Layout,
    /// Sequence number of the last pointer event delivered.
    pointer_seq: u64,
    active_category: usize,
    cart: Vec<&'static str>,
    status: Option<String>,
    quit: bool,
}

impl Storefront {
    pub fn new(width: u16, height: u16, config: OverlayConfig) -> Result<Self, OverlayError> {
        let mut overlays = Overlays::with_config(FrameQueue::new(), config);
        let surfaces = Surfaces {
            menu: overlays.create_surface(catalog::menu_children(), OverlaySpec::slide_menu())?,
            categories: overlays.create_surface(catalog::category_children(), OverlaySpec::dropdown())?,
            special: overlays.create_surface(catalog::product_children(), OverlaySpec::modal())?,
        };

        for (name, handle) in [
            ("menu", surfaces.menu),
            ("categories", surfaces.categories),
            ("special", surfaces.special),
        ] {
            overlays.on_state_change(handle, move |change| {
                info!(
                    "Overlay {} {:?} -> {:?} (generation {}, reason {:?})",
                    name, change.from, change.to, change.generation, change.reason
                );
            })?;
        }

        let mut app = Self {
            overlays,
            surfaces,
            layout: Layout::default(),
            pointer_seq: 0,
            active_category: 0,
            cart: Vec::new(),
            status: None,
            quit: false,
        };
        app.resize(width, height)?;
        Ok(app)
    }

    pub fn overlays(&self) -> &Overlays<FrameQueue> {
        &self.overlays
    }

    pub fn surfaces(&self) -> &Surfaces {
        &self.surfaces
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn active_category(&self) -> usize {
        self.active_category
    }

    pub fn cart_len(&self) -> usize {
        self.cart.len()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn is_animating(&self) -> bool {
        self.overlays.has_pending_frames()
    }

    /// Run one animation frame.
    pub fn tick(&mut self, now: Instant) {
        let delivered = self.overlays.advance(now);
        trace!("Frame delivered {} callbacks", delivered);
    }

    /// Recompute geometry and hand the new bounds to the controller.
    pub fn resize(&mut self, width: u16, height: u16) -> Result<(), OverlayError> {
        debug!("Layout for {}x{}", width, height);
        self.layout = Layout::compute(width, height);
        let layout = self.layout;
        self.overlays
            .set_bounds(self.surfaces.menu, vec![layout.menu_panel])?;
        // The trigger counts as inside so clicking it toggles instead of
        // dismissing and reopening.
        self.overlays.set_bounds(
            self.surfaces.categories,
            vec![layout.dropdown_panel, layout.categories_trigger],
        )?;
        self.overlays
            .set_bounds(self.surfaces.special, vec![layout.modal_panel])
    }

    pub fn handle_event(&mut self, event: Event) -> Result<(), OverlayError> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                self.handle_click(mouse.column, mouse.row)
            }
            Event::Resize(width, height) => self.resize(width, height),
            _ => Ok(()),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<(), OverlayError> {
        let categories_open = self.overlays.accepts_input(self.surfaces.categories)?;
        match key.code {
            KeyCode::Char('q') => self.quit = true,
            KeyCode::Esc => {
                if let Some(surface) = self.overlays.escape_pressed() {
                    debug!("Escape dismissed surface {}", surface);
                }
            }
            KeyCode::Char('m') => self.overlays.toggle(self.surfaces.menu)?,
            KeyCode::Char('c') => self.overlays.toggle(self.surfaces.categories)?,
            KeyCode::Char('s') => self.overlays.toggle(self.surfaces.special)?,
            KeyCode::Char('r') => {
                let enabled = !self.overlays.config().reduced_motion;
                self.overlays.set_reduced_motion(enabled);
                self.status = Some(format!(
                    "Reduced motion {}",
                    if enabled { "on" } else { "off" }
                ));
            }
            KeyCode::Up if categories_open => {
                self.select_category(self.active_category.saturating_sub(1));
            }
            KeyCode::Down if categories_open => {
                self.select_category((self.active_category + 1).min(CATEGORIES.len() - 1));
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_click(&mut self, x: u16, y: u16) -> Result<(), OverlayError> {
        self.pointer_seq += 1;
        let event = PointerEvent::new(self.pointer_seq, x, y);

        // A backdrop covers the navbar; clicks on it only dismiss.
        let covered = self.overlays.is_mounted(self.surfaces.menu)?
            || self.overlays.is_mounted(self.surfaces.special)?;

        let dismissed = self.overlays.pointer_down(event);
        if !dismissed.is_empty() {
            debug!("Click at ({}, {}) dismissed {:?}", x, y, dismissed);
        }

        if let Some(surface) = self.overlays.hit_test(x, y) {
            return self.click_inside(surface, &event);
        }
        if covered {
            return Ok(());
        }

        let target = match self.layout.trigger_at(x, y) {
            Some(Trigger::Menu) => self.surfaces.menu,
            Some(Trigger::Categories) => self.surfaces.categories,
            Some(Trigger::Special) => self.surfaces.special,
            None => return Ok(()),
        };
        self.overlays.toggle_from(target, &event)
    }

    fn click_inside(&mut self, surface: SurfaceHandle, event: &PointerEvent) -> Result<(), OverlayError> {
        let (x, y) = (event.x, event.y);
        let layout = self.layout;

        if surface == self.surfaces.menu {
            if layout.menu_close().contains(x, y) {
                return self.overlays.close(surface);
            }
            let Some(index) = layout.menu_item_at(x, y) else {
                return Ok(());
            };
            self.overlays.close(surface)?;
            match MENU[index].target {
                MenuTarget::Page(path) => {
                    self.status = Some(format!("Navigated to {}", path));
                    Ok(())
                }
                MenuTarget::Categories => self.overlays.open_from(self.surfaces.categories, event),
                MenuTarget::SpecialCollection => self.overlays.open_from(self.surfaces.special, event),
            }
        } else if surface == self.surfaces.categories {
            if layout.categories_trigger.contains(x, y) {
                return self.overlays.toggle_from(surface, event);
            }
            if let Some(index) = layout.category_at(x, y) {
                self.select_category(index);
            } else {
                let items = &CATEGORIES[self.active_category].items;
                if let Some(index) = layout.subcategory_at(x, y, items.len()) {
                    self.status = Some(format!("Browsing {}", items[index]));
                }
            }
            Ok(())
        } else if surface == self.surfaces.special {
            if layout.modal_close().contains(x, y) {
                return self.overlays.close(surface);
            }
            if let Some(index) = layout.product_at(x, y) {
                let product = &PRODUCTS[index];
                self.cart.push(product.name);
                self.status = Some(format!("Added {} to cart", product.name));
                info!("Cart now holds {} items", self.cart.len());
            }
            Ok(())
        } else {
            Ok(())
        }
    }

    fn select_category(&mut self, index: usize) {
        if index != self.active_category {
            debug!("Active category: {}", CATEGORIES[index].key);
        }
        self.active_category = index;
    }
}
