//! Price labels and the product page image gallery.

use crate::api::{Price, ProductDetail};

/// Thousands separator used by the storefront locale (a no-break space).
const GROUP_SEPARATOR: char = '\u{a0}';
const CURRENCY_SUFFIX: &str = " ₽";

/// Whole-unit price label, e.g. `12 990 ₽`.
pub fn format_price(amount: f64) -> String {
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 4);
    if rounded < 0.0 {
        grouped.push('-');
    }
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(GROUP_SEPARATOR);
        }
        grouped.push(digit);
    }
    grouped.push_str(CURRENCY_SUFFIX);
    grouped
}

impl Price {
    /// [`format_price`] of this price; `None` when it is not a number.
    pub fn label(&self) -> Option<String> {
        self.value().filter(|v| v.is_finite()).map(format_price)
    }
}

/// Main image plus thumbnails on the product page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductGallery {
    main_image: String,
    images: Vec<String>,
}

impl ProductGallery {
    pub fn new(main_image: impl Into<String>) -> Self {
        let main_image = main_image.into();
        Self {
            images: vec![main_image.clone()],
            main_image,
        }
    }

    /// Gallery over the product's images, starting on the first.
    pub fn for_product(product: &ProductDetail) -> Option<Self> {
        let main_image = product.images.first()?.clone();
        Some(Self {
            main_image,
            images: product.images.clone(),
        })
    }

    pub fn main_image(&self) -> &str {
        &self.main_image
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    /// Show `image` as the main image. Returns whether anything changed.
    pub fn change_image(&mut self, image: &str) -> bool {
        if self.main_image == image {
            return false;
        }
        self.main_image = image.to_string();
        true
    }
}
