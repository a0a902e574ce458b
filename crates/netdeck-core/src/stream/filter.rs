// ── Filter predicates for the merged device list ──

use crate::model::{Device, DeviceCategory, DeviceKind, DeviceStatus};

/// Filter predicate over the merged device list.
#[derive(Default)]
pub enum DeviceFilter {
    #[default]
    All,
    ByKind(DeviceKind),
    ByCategory(DeviceCategory),
    ByStatus(DeviceStatus),
    /// Case-insensitive substring match on name, address or identifier.
    /// An empty needle matches everything.
    Text(String),
    Custom(Box<dyn Fn(&Device) -> bool + Send + Sync>),
}

impl DeviceFilter {
    /// Build a text filter, treating blank input as "no filter".
    pub fn text(needle: impl AsRef<str>) -> Self {
        let needle = needle.as_ref().trim();
        if needle.is_empty() {
            Self::All
        } else {
            Self::Text(needle.to_lowercase())
        }
    }

    pub fn matches(&self, device: &Device) -> bool {
        match self {
            Self::All => true,
            Self::ByKind(kind) => device.kind() == *kind,
            Self::ByCategory(category) => device.category() == *category,
            Self::ByStatus(status) => device.status() == *status,
            Self::Text(needle) => {
                let needle = needle.to_lowercase();
                needle.is_empty()
                    || device.name().to_lowercase().contains(&needle)
                    || device.address_label().to_lowercase().contains(&needle)
                    || device.id().as_str().to_lowercase().contains(&needle)
            }
            Self::Custom(f) => f(device),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;
    use std::sync::Arc;

    use chrono::Utc;

    use super::*;
    use crate::model::{DeviceId, DeviceInfo, IpDevice, LinkType, Traffic};

    fn tv() -> Device {
        Device::Ip(Arc::new(IpDevice {
            info: DeviceInfo {
                name: "Samsung TV 55".into(),
                id: DeviceId::from("F8:3F:51:A1:B2:C3"),
                category: DeviceCategory::Tv,
                status: DeviceStatus::Online,
                discovered_at: Utc::now(),
                traffic: Traffic::ZERO,
            },
            ip: Ipv4Addr::new(192, 168, 50, 22),
            link: LinkType::Band24Ghz,
            latency_ms: 9,
        }))
    }

    #[test]
    fn text_matches_name_address_and_id() {
        let device = tv();
        assert!(DeviceFilter::text("samsung").matches(&device));
        assert!(DeviceFilter::text("50.22").matches(&device));
        assert!(DeviceFilter::text("f8:3f").matches(&device));
        assert!(!DeviceFilter::text("iphone").matches(&device));
    }

    #[test]
    fn blank_text_matches_everything() {
        assert!(matches!(DeviceFilter::text("   "), DeviceFilter::All));
        assert!(DeviceFilter::Text(String::new()).matches(&tv()));
    }

    #[test]
    fn structural_filters() {
        let device = tv();
        assert!(DeviceFilter::ByKind(DeviceKind::Ip).matches(&device));
        assert!(!DeviceFilter::ByKind(DeviceKind::Peripheral).matches(&device));
        assert!(DeviceFilter::ByCategory(DeviceCategory::Tv).matches(&device));
        assert!(!DeviceFilter::ByStatus(DeviceStatus::Sync).matches(&device));
        assert!(DeviceFilter::Custom(Box::new(|d| d.accepts_remote())).matches(&device));
    }
}
