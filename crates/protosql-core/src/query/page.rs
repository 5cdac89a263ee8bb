use crate::config::SqlConfig;

///
/// Pager
///
/// Anything that carries a page size and a zero-based page number,
/// typically an API request message.
///

pub trait Pager {
    fn page_size(&self) -> u32;

    fn current_page(&self) -> u32;
}

impl<P: Pager + ?Sized> Pager for &P {
    fn page_size(&self) -> u32 {
        (**self).page_size()
    }

    fn current_page(&self) -> u32 {
        (**self).current_page()
    }
}

///
/// Page
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Page {
    pub number: u32,
    pub size: u32,
}

impl Pager for Page {
    fn page_size(&self) -> u32 {
        self.size
    }

    fn current_page(&self) -> u32 {
        self.number
    }
}

/// Page `number` (zero-based) of `size` rows.
#[must_use]
pub const fn page(number: u32, size: u32) -> Page {
    Page { number, size }
}

/// ` LIMIT n` plus ` OFFSET m` for any page after the first.
#[must_use]
pub fn page_clause(pager: &impl Pager, config: &SqlConfig) -> String {
    let size = config.clamp_page_size(pager.page_size());
    let number = pager.current_page();

    if number == 0 {
        format!(" LIMIT {size}")
    } else {
        let offset = u64::from(number) * u64::from(size);
        format!(" LIMIT {size} OFFSET {offset}")
    }
}
