use crate::facade::OperationFacade;
use tabgate_core::well_known::MANAGEMENT;
use tabgate_core::{AppDescriptor, GateEvent, Result, UninstallOptions};
use tracing::info;

impl OperationFacade {
    pub async fn list_applications(&self) -> Result<Vec<AppDescriptor>> {
        self.gate.require(MANAGEMENT).await?;
        self.host_call("list_applications", self.management.list_apps())
            .await
    }

    pub async fn launch_application(&self, id: &str) -> Result<()> {
        self.gate.require(MANAGEMENT).await?;
        self.host_call("launch_application", self.management.launch_app(id))
            .await?;
        info!("Launched application {}", id);
        Ok(())
    }

    /// Uninstall behind the host's confirmation dialog. Publishes
    /// `ApplicationUninstalled` once the host reports success.
    pub async fn uninstall_application(&self, id: &str) -> Result<()> {
        self.gate.require(MANAGEMENT).await?;

        let options = UninstallOptions {
            show_confirm_dialog: true,
        };
        self.host_call(
            "uninstall_application",
            self.management.uninstall_app(id, options),
        )
        .await?;

        info!("Uninstalled application {}", id);
        self.events.publish(GateEvent::ApplicationUninstalled);
        Ok(())
    }
}
