//! Mock catalog shown by the storefront.

use curtain::ChildItem;

/// Where a slide-menu entry leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuTarget {
    Page(&'static str),
    Categories,
    SpecialCollection,
}

#[derive(Debug, Clone, Copy)]
pub struct MenuItem {
    pub label: &'static str,
    pub target: MenuTarget,
}

#[derive(Debug, Clone, Copy)]
pub struct Category {
    pub key: &'static str,
    pub title: &'static str,
    pub items: [&'static str; 6],
}

#[derive(Debug, Clone, Copy)]
pub struct Product {
    pub name: &'static str,
    pub price: &'static str,
    pub weight: &'static str,
    pub description: &'static str,
}

pub static MENU: [MenuItem; 5] = [
    MenuItem {
        label: "Home",
        target: MenuTarget::Page("/"),
    },
    MenuItem {
        label: "Offers",
        target: MenuTarget::Page("/offers"),
    },
    MenuItem {
        label: "Wishlist",
        target: MenuTarget::Page("/wishlist"),
    },
    MenuItem {
        label: "Categories",
        target: MenuTarget::Categories,
    },
    MenuItem {
        label: "Special Collection",
        target: MenuTarget::SpecialCollection,
    },
];

pub static CATEGORIES: [Category; 5] = [
    Category {
        key: "string",
        title: "String Instruments",
        items: ["Violin", "Guitar", "Cello", "Bass", "Viola", "Harp"],
    },
    Category {
        key: "piano",
        title: "Keyboard & Piano",
        items: [
            "Grand Piano",
            "Upright Piano",
            "Digital Piano",
            "Keyboard",
            "Synthesizer",
            "MIDI Controller",
        ],
    },
    Category {
        key: "traditional",
        title: "Traditional Instruments",
        items: ["Sitar", "Tabla", "Harmonium", "Santoor", "Veena", "Sarod"],
    },
    Category {
        key: "brass",
        title: "Brass Instruments",
        items: ["Trumpet", "Trombone", "French Horn", "Tuba", "Euphonium", "Cornet"],
    },
    Category {
        key: "wind",
        title: "Wind Instruments",
        items: ["Flute", "Clarinet", "Saxophone", "Oboe", "Bassoon", "Piccolo"],
    },
];

pub static PRODUCTS: [Product; 3] = [
    Product {
        name: "Classic Salted Makhana",
        price: "₹199",
        weight: "100g",
        description: "Perfectly roasted and lightly salted lotus seeds",
    },
    Product {
        name: "Spicy Masala Makhana",
        price: "₹219",
        weight: "100g",
        description: "Tangy and spicy masala flavored fox nuts",
    },
    Product {
        name: "Cheese & Herbs Makhana",
        price: "₹249",
        weight: "100g",
        description: "Cheesy and herby flavored premium fox nuts",
    },
];

pub fn menu_children() -> Vec<ChildItem> {
    MENU.iter().map(|item| ChildItem::new(item.label)).collect()
}

pub fn category_children() -> Vec<ChildItem> {
    CATEGORIES.iter().map(|c| ChildItem::new(c.key)).collect()
}

pub fn product_children() -> Vec<ChildItem> {
    PRODUCTS.iter().map(|p| ChildItem::new(p.name)).collect()
}
