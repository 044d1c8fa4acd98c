use plotkit::{init_logging, list_ports, MachineProfile, ProfileStore, BUILD_DATE, VERSION};

fn main() -> anyhow::Result<()> {
    init_logging()?;

    tracing::info!(version = VERSION, build = BUILD_DATE, "plotkit starting");

    let store = ProfileStore::new()?;
    let profile: MachineProfile = store.load_last_used_or_default();
    let bed = format!("{}x{} mm", profile.bed_width, profile.bed_height);
    tracing::info!(
        profile = %profile.name,
        bed = %bed,
        controller = %profile.controller,
        "active machine profile"
    );

    match list_ports() {
        Ok(ports) if ports.is_empty() => tracing::info!("no controller ports detected"),
        Ok(ports) => {
            for port in ports {
                tracing::info!(port = %port.port_name, description = %port.description, "port available");
            }
        }
        Err(e) => tracing::warn!(error = %e, "port enumeration failed"),
    }

    Ok(())
}
