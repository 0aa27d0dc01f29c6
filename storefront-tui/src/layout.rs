//! Screen geometry of the storefront.
//!
//! Everything is computed from the terminal size. Surfaces animate inside
//! these rectangles; hit testing always uses the resting geometry since
//! only `Open` surfaces take input.

use curtain::Rect;
use unicode_width::UnicodeWidthStr;

use crate::catalog::{CATEGORIES, MENU, PRODUCTS};

pub const BRAND: &str = "Melody & Makhana";
pub const MENU_LABEL: &str = "≡ Menu";
pub const CATEGORIES_LABEL: &str = "Categories ▾";
pub const SPECIAL_LABEL: &str = "Special Collection";

const MENU_WIDTH: u16 = 30;
const DROPDOWN_WIDTH: u16 = 72;
const MODAL_WIDTH: u16 = 64;

/// Subcategories are laid out in a grid this many columns wide.
pub const GRID_COLUMNS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Menu,
    Categories,
    Special,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Layout {
    pub screen: Rect,
    pub menu_trigger: Rect,
    pub categories_trigger: Rect,
    pub special_trigger: Rect,
    pub menu_panel: Rect,
    pub dropdown_panel: Rect,
    pub modal_panel: Rect,
}

impl Layout {
    pub fn compute(width: u16, height: u16) -> Self {
        let menu_trigger = Rect::new(1, 0, label_width(MENU_LABEL) + 2, 1);
        let brand_end = menu_trigger.right() + 2 + label_width(BRAND);
        let categories_trigger = Rect::new(brand_end + 4, 0, label_width(CATEGORIES_LABEL) + 2, 1);
        let special_trigger = Rect::new(
            categories_trigger.right() + 1,
            0,
            label_width(SPECIAL_LABEL) + 2,
            1,
        );

        let menu_panel = Rect::new(0, 0, MENU_WIDTH.min(width), height);

        let dropdown_height = (CATEGORIES.len() as u16 + 4).min(height.saturating_sub(1));
        let dropdown_panel = Rect::new(
            categories_trigger.x,
            1,
            DROPDOWN_WIDTH.min(width.saturating_sub(categories_trigger.x)),
            dropdown_height,
        );

        let modal_width = MODAL_WIDTH.min(width.saturating_sub(4));
        let modal_height = (PRODUCTS.len() as u16 * 3 + 4).min(height);
        let modal_panel = Rect::new(
            width.saturating_sub(modal_width) / 2,
            height.saturating_sub(modal_height) / 2,
            modal_width,
            modal_height,
        );

        Self {
            screen: Rect::new(0, 0, width, height),
            menu_trigger,
            categories_trigger,
            special_trigger,
            menu_panel,
            dropdown_panel,
            modal_panel,
        }
    }

    pub fn trigger_at(&self, x: u16, y: u16) -> Option<Trigger> {
        if self.menu_trigger.contains(x, y) {
            Some(Trigger::Menu)
        } else if self.categories_trigger.contains(x, y) {
            Some(Trigger::Categories)
        } else if self.special_trigger.contains(x, y) {
            Some(Trigger::Special)
        } else {
            None
        }
    }

    // -------------------------------------------------------------------------
    // Slide menu
    // -------------------------------------------------------------------------

    pub fn menu_close(&self) -> Rect {
        Rect::new(self.menu_panel.right().saturating_sub(4), self.menu_panel.y + 1, 3, 1)
    }

    pub fn menu_item_row(&self, index: usize) -> u16 {
        self.menu_panel.y + 3 + index as u16 * 2
    }

    pub fn menu_item_at(&self, x: u16, y: u16) -> Option<usize> {
        if !self.menu_panel.contains(x, y) {
            return None;
        }
        (0..MENU.len()).find(|i| self.menu_item_row(*i) == y)
    }

    // -------------------------------------------------------------------------
    // Categories dropdown
    // -------------------------------------------------------------------------

    /// Width of the category list on the left of the dropdown.
    pub fn category_column(&self) -> u16 {
        self.dropdown_panel.width / 3
    }

    pub fn category_row(&self, index: usize) -> u16 {
        self.dropdown_panel.y + 2 + index as u16
    }

    pub fn category_at(&self, x: u16, y: u16) -> Option<usize> {
        let panel = self.dropdown_panel;
        if !panel.contains(x, y) || x >= panel.x + self.category_column() {
            return None;
        }
        (0..CATEGORIES.len()).find(|i| self.category_row(*i) == y)
    }

    /// Top-left cell of subcategory `index` in the grid.
    pub fn subcategory_cell(&self, index: usize) -> (u16, u16) {
        let panel = self.dropdown_panel;
        let left = panel.x + self.category_column() + 2;
        let column_width = self.subcategory_width();
        let column = (index % GRID_COLUMNS) as u16;
        let row = (index / GRID_COLUMNS) as u16;
        (left + column * column_width, panel.y + 3 + row * 2)
    }

    pub fn subcategory_width(&self) -> u16 {
        let used = self.category_column() + 3;
        self.dropdown_panel.width.saturating_sub(used) / GRID_COLUMNS as u16
    }

    pub fn subcategory_at(&self, x: u16, y: u16, count: usize) -> Option<usize> {
        if !self.dropdown_panel.contains(x, y) {
            return None;
        }
        let width = self.subcategory_width();
        (0..count).find(|i| {
            let (cx, cy) = self.subcategory_cell(*i);
            cy == y && x >= cx && x < cx + width
        })
    }

    // -------------------------------------------------------------------------
    // Special collection modal
    // -------------------------------------------------------------------------

    pub fn modal_close(&self) -> Rect {
        Rect::new(self.modal_panel.right().saturating_sub(5), self.modal_panel.y + 1, 3, 1)
    }

    pub fn product_row(&self, index: usize) -> u16 {
        self.modal_panel.y + 3 + index as u16 * 3
    }

    pub fn product_at(&self, x: u16, y: u16) -> Option<usize> {
        if !self.modal_panel.contains(x, y) {
            return None;
        }
        (0..PRODUCTS.len()).find(|i| {
            let row = self.product_row(*i);
            y >= row && y < row + 2
        })
    }
}

pub fn label_width(label: &str) -> u16 {
    u16::try_from(label.width()).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triggers_sit_on_the_navbar_in_order() {
        let layout = Layout::compute(120, 40);
        assert_eq!(layout.trigger_at(layout.menu_trigger.x, 0), Some(Trigger::Menu));
        assert_eq!(
            layout.trigger_at(layout.categories_trigger.x, 0),
            Some(Trigger::Categories)
        );
        assert_eq!(
            layout.trigger_at(layout.special_trigger.right() - 1, 0),
            Some(Trigger::Special)
        );
        assert_eq!(layout.trigger_at(layout.categories_trigger.x, 1), None);
        assert!(layout.menu_trigger.right() <= layout.categories_trigger.x);
        assert!(layout.categories_trigger.right() <= layout.special_trigger.x);
    }

    #[test]
    fn panels_fit_the_screen() {
        let layout = Layout::compute(50, 12);
        for rect in [layout.menu_panel, layout.dropdown_panel, layout.modal_panel] {
            assert!(rect.right() <= 50, "{:?}", rect);
            assert!(rect.bottom() <= 12, "{:?}", rect);
        }
    }

    #[test]
    fn menu_rows_map_to_items() {
        let layout = Layout::compute(120, 40);
        let row = layout.menu_item_row(2);
        assert_eq!(layout.menu_item_at(3, row), Some(2));
        assert_eq!(layout.menu_item_at(3, row + 1), None);
        assert_eq!(layout.menu_item_at(layout.menu_panel.right(), row), None);
    }

    #[test]
    fn dropdown_regions() {
        let layout = Layout::compute(120, 40);
        let x = layout.dropdown_panel.x + 1;
        assert_eq!(layout.category_at(x, layout.category_row(4)), Some(4));

        let (cx, cy) = layout.subcategory_cell(4);
        assert_eq!(layout.subcategory_at(cx, cy, 6), Some(4));
        assert_eq!(layout.category_at(cx, cy), None);
    }

    #[test]
    fn product_rows_span_two_lines() {
        let layout = Layout::compute(120, 40);
        let x = layout.modal_panel.x + 2;
        let row = layout.product_row(1);
        assert_eq!(layout.product_at(x, row), Some(1));
        assert_eq!(layout.product_at(x, row + 1), Some(1));
        assert_eq!(layout.product_at(x, row + 2), None);
    }
}
