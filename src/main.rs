use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use truck_inventory::config::environment::EnvironmentConfig;
use truck_inventory::routes::create_router;
use truck_inventory::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("🚚 Consulting Truck - Inventario y Catálogo");
    info!("===========================================");

    let config = EnvironmentConfig::from_env().map_err(|e| {
        error!("❌ Configuración inválida: {}", e);
        anyhow::anyhow!("Error de configuración: {}", e)
    })?;
    let addr: SocketAddr = config.server_url().parse()?;

    info!("🌍 Entorno: {}", config.environment);
    info!("📄 Inventario: {}", config.inventory_csv_path.display());
    info!("🖼️ Fotos: {}", config.images_dir.display());

    let app_state = AppState::new(config)?;
    if let Err(e) = app_state.inventory.initialize().await {
        error!("❌ No se pudo preparar el almacenamiento: {}", e);
        return Err(anyhow::anyhow!("Error de almacenamiento: {}", e));
    }

    let app = create_router(app_state);

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints públicos:");
    info!("   GET  /health - Estado del servicio");
    info!("   GET  /api/catalog - Catálogo de camiones disponibles");
    info!("   GET  /api/catalog/filters - Opciones de filtro del catálogo");
    info!("   GET  /images/:file - Fotos");
    info!("   POST /api/auth/login - Login de administración");
    info!("🔐 Endpoints de administración:");
    info!("   GET  /api/trucks - Listar inventario");
    info!("   POST /api/trucks - Crear camión");
    info!("   GET  /api/trucks/:id - Obtener camión");
    info!("   PUT  /api/trucks/:id - Editar camión");
    info!("   POST /api/trucks/:id/sold - Marcar vendido");
    info!("   POST /api/trucks/:id/available - Marcar disponible");
    info!("   POST /api/trucks/:id/delete-request - Solicitar borrado");
    info!("   POST /api/trucks/:id/delete-confirmation - Confirmar borrado");
    info!("   GET  /api/analytics/summary - Resumen del dashboard");
    info!("   GET  /api/transfer/export - Exportar CSV");
    info!("   POST /api/transfer/import - Importar CSV");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            e
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
