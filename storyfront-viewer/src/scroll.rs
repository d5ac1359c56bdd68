/// The host page styles touched while the viewer is open.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HostStyle {
    pub body_overflow: String,
    pub body_padding_right: String,
    pub root_overscroll: String,
}

impl HostStyle {
    pub fn body_css(&self) -> String {
        declarations(&[
            ("overflow", &self.body_overflow),
            ("padding-right", &self.body_padding_right),
        ])
    }

    pub fn root_css(&self) -> String {
        declarations(&[("overscroll-behavior", &self.root_overscroll)])
    }
}

fn declarations(pairs: &[(&str, &String)]) -> String {
    pairs
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(name, value)| format!("{}: {};", name, value))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Window measurements used to size the scrollbar gutter.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    pub inner_width: f64,
    pub client_width: f64,
}

impl Viewport {
    pub fn scrollbar_width(&self) -> f64 {
        (self.inner_width - self.client_width).max(0.0)
    }
}

/// Suspends page scrolling and remembers what to put back.
#[derive(Debug)]
#[must_use = "the host stays locked until the lock is released"]
pub struct ScrollLock {
    saved: HostStyle,
}

impl ScrollLock {
    pub fn engage(host: &mut HostStyle, viewport: Viewport) -> Self {
        let saved = host.clone();

        host.body_overflow = "hidden".to_string();

        let gutter = viewport.scrollbar_width();
        if gutter > 0.0 {
            host.body_padding_right = format!("{}px", gutter);
        }

        host.root_overscroll = "none".to_string();

        Self { saved }
    }

    pub fn release(self, host: &mut HostStyle) {
        *host = self.saved;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_then_release_restores_exactly() {
        let original = HostStyle {
            body_overflow: "auto".into(),
            body_padding_right: "4px".into(),
            root_overscroll: String::new(),
        };
        let mut host = original.clone();

        let lock = ScrollLock::engage(
            &mut host,
            Viewport {
                inner_width: 1280.0,
                client_width: 1265.0,
            },
        );

        assert_eq!(host.body_css(), "overflow: hidden; padding-right: 15px;");
        assert_eq!(host.root_css(), "overscroll-behavior: none;");

        lock.release(&mut host);

        assert_eq!(host, original);
    }

    #[test]
    fn no_scrollbar_keeps_padding() {
        let mut host = HostStyle::default();

        let _lock = ScrollLock::engage(&mut host, Viewport::default());

        assert_eq!(host.body_padding_right, "");
        assert_eq!(host.body_css(), "overflow: hidden;");
    }
}
