//! Host description printed above the results.

/// Operating system name and version as reported by `os_info`.
pub fn os_description() -> String {
    let info = os_info::get();
    format!("{} {}", info.os_type(), info.version())
}

/// CPU brand string, or "Unknown" where it cannot be read.
pub fn cpu_brand() -> String {
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    {
        let cpuid = raw_cpuid::CpuId::new();
        if let Some(brand) = cpuid.get_processor_brand_string() {
            return brand.as_str().trim().to_string();
        }
    }
    "Unknown".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptions_are_never_empty() {
        assert!(!os_description().trim().is_empty());
        assert!(!cpu_brand().is_empty());
    }
}
