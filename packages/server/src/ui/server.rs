//! Per-room HTTP listener.

use std::{future::Future, net::SocketAddr, sync::Arc};

use async_trait::async_trait;
use axum::{
    Router,
    routing::{any, get},
};
use tokio::{net::TcpListener, sync::Mutex, task::JoinSet};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{
    domain::{ChatRoom, LaunchError, RoomLauncher, ShutdownReceiver, wait_for_shutdown},
    usecase::DispatchMessagesUseCase,
};

use super::{
    config::ServerConfig,
    handler::{create_server, get_room_detail, get_rooms, health_check, websocket_handler},
    state::{AdminState, RoomState},
};

/// Admin routes, mounted on the primary room only.
pub fn admin_router(state: Arc<AdminState>) -> Router {
    Router::new()
        .route("/api/create-server", any(create_server))
        .route("/api/health", get(health_check))
        .route("/api/rooms", get(get_rooms))
        .route("/api/rooms/{port}", get(get_room_detail))
        .with_state(state)
}

/// HTTP server of one chat room
///
/// # Example
///
/// ```ignore
/// let server = RoomServer::new(room, config).bind().await?;
/// let serving = server.start(shutdown_rx)?;
/// tokio::spawn(serving);
/// ```
pub struct RoomServer {
    room: Arc<ChatRoom>,
    config: Arc<ServerConfig>,
    admin: Option<Arc<AdminState>>,
}

impl RoomServer {
    pub fn new(room: Arc<ChatRoom>, config: Arc<ServerConfig>) -> Self {
        Self {
            room,
            config,
            admin: None,
        }
    }

    /// Also serve the admin API from this room.
    pub fn with_admin(mut self, admin: Arc<AdminState>) -> Self {
        self.admin = Some(admin);
        self
    }

    /// `/ws` joins the room, every other path is a static asset.
    pub fn router(&self) -> Router {
        let state = Arc::new(RoomState::new(
            self.room.clone(),
            self.config.outbound_capacity,
        ));

        let mut router = Router::new()
            .route("/ws", get(websocket_handler))
            .with_state(state);
        if let Some(admin) = &self.admin {
            router = router.merge(admin_router(admin.clone()));
        }

        router
            .fallback_service(ServeDir::new(&self.config.public_dir))
            .layer(TraceLayer::new_for_http())
    }

    /// Bind the room's port on the configured host.
    ///
    /// # Errors
    ///
    /// Returns `LaunchError::Bind` if the port cannot be acquired.
    pub async fn bind(self) -> Result<BoundRoomServer, LaunchError> {
        let port = self.room.port();
        let bind_error = |source| LaunchError::Bind { port, source };

        let router = self.router();
        let listener = TcpListener::bind((self.config.host.as_str(), port.value()))
            .await
            .map_err(bind_error)?;
        let local_addr = listener.local_addr().map_err(bind_error)?;

        Ok(BoundRoomServer {
            room: self.room,
            router,
            listener,
            local_addr,
        })
    }
}

/// A room whose listener is bound but not yet serving.
pub struct BoundRoomServer {
    room: Arc<ChatRoom>,
    router: Router,
    listener: TcpListener,
    local_addr: SocketAddr,
}

impl BoundRoomServer {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Start the room's dispatcher and return the future that serves HTTP
    /// until shutdown, then waits for the dispatcher to close every client.
    pub fn start(
        self,
        shutdown: ShutdownReceiver,
    ) -> Result<impl Future<Output = ()> + Send + 'static, LaunchError> {
        let dispatcher = DispatchMessagesUseCase::new(self.room.clone()).spawn(shutdown.clone())?;
        let room_id = self.room.id().clone();

        tracing::info!("Starting chat server {} on {}", room_id, self.local_addr);
        tracing::info!("Connect to: ws://{}/ws", self.local_addr);

        Ok(async move {
            if let Err(e) = axum::serve(self.listener, self.router)
                .with_graceful_shutdown(wait_for_shutdown(shutdown))
                .await
            {
                tracing::error!("Error serving chat server {}: {}", room_id, e);
            }
            if let Err(e) = dispatcher.await {
                tracing::error!("Dispatcher of chat server {} failed: {}", room_id, e);
            }
            tracing::info!("Chat server {} stopped", room_id);
        })
    }
}

/// `RoomLauncher` backed by axum; keeps every serving task so shutdown can
/// wait for them.
pub struct AxumRoomLauncher {
    config: Arc<ServerConfig>,
    shutdown: ShutdownReceiver,
    tasks: Mutex<JoinSet<()>>,
}

impl AxumRoomLauncher {
    pub fn new(config: Arc<ServerConfig>, shutdown: ShutdownReceiver) -> Self {
        Self {
            config,
            shutdown,
            tasks: Mutex::new(JoinSet::new()),
        }
    }

    /// Serve an already bound room in the background.
    pub async fn start(&self, server: BoundRoomServer) -> Result<SocketAddr, LaunchError> {
        let local_addr = server.local_addr();
        let serving = server.start(self.shutdown.clone())?;
        self.tasks.lock().await.spawn(serving);
        Ok(local_addr)
    }

    /// Wait until every room started by this launcher has stopped.
    pub async fn wait(&self) {
        let mut tasks = std::mem::take(&mut *self.tasks.lock().await);
        while let Some(result) = tasks.join_next().await {
            if let Err(e) = result {
                tracing::error!("Room task failed: {}", e);
            }
        }
    }
}

#[async_trait]
impl RoomLauncher for AxumRoomLauncher {
    async fn launch(&self, room: Arc<ChatRoom>) -> Result<SocketAddr, LaunchError> {
        let server = RoomServer::new(room, self.config.clone()).bind().await?;
        self.start(server).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{MessagePusher, Port, RoomId, RoomRepository},
        infrastructure::{
            message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository,
        },
        usecase::{CreateRoomUseCase, GetRoomDetailUseCase, GetRoomsUseCase},
    };
    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode},
    };
    use tokio::sync::watch;
    use tower::ServiceExt;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - 管理 API の HTTP ステータスと本文（405 / 400 / 200）
    // - プライマリ以外のルームには管理 API が無いこと
    // - 同じポートへの bind 失敗が LaunchError::Bind になること
    // ========================================

    fn pusher_factory() -> Arc<dyn MessagePusher> {
        Arc::new(WebSocketMessagePusher::new())
    }

    fn test_config() -> Arc<ServerConfig> {
        Arc::new(ServerConfig {
            host: "127.0.0.1".to_string(),
            ..ServerConfig::default()
        })
    }

    fn create_room(id: &str, port: &str) -> Arc<ChatRoom> {
        Arc::new(ChatRoom::new(
            RoomId::new(id),
            Port::parse(port).unwrap(),
            pusher_factory(),
            8,
        ))
    }

    fn primary_router(repository: Arc<InMemoryRoomRepository>) -> Router {
        let (_tx, shutdown) = watch::channel(false);
        let config = test_config();
        let launcher = Arc::new(AxumRoomLauncher::new(config.clone(), shutdown));
        let admin = Arc::new(AdminState {
            create_room_usecase: Arc::new(CreateRoomUseCase::new(
                repository.clone(),
                launcher,
                pusher_factory,
                8,
            )),
            get_rooms_usecase: GetRoomsUseCase::new(repository.clone()),
            get_room_detail_usecase: GetRoomDetailUseCase::new(repository),
        });
        RoomServer::new(create_room("main", "8080"), config)
            .with_admin(admin)
            .router()
    }

    async fn send(router: Router, method: Method, uri: &str) -> (StatusCode, String) {
        let response = router
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_create_server_rejects_non_post() {
        // テスト項目: POST 以外のメソッドは 405 になる
        // given (前提条件):
        let router = primary_router(Arc::new(InMemoryRoomRepository::new()));

        // when (操作):
        let (status, body) = send(router, Method::GET, "/api/create-server?port=9091").await;

        // then (期待する結果):
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body, "Method not allowed");
    }

    #[tokio::test]
    async fn test_create_server_requires_port() {
        // テスト項目: port パラメータが無い・空の場合は 400 になる
        for uri in ["/api/create-server", "/api/create-server?port="] {
            // given (前提条件):
            let router = primary_router(Arc::new(InMemoryRoomRepository::new()));

            // when (操作):
            let (status, body) = send(router, Method::POST, uri).await;

            // then (期待する結果):
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body, "Port parameter is required");
        }
    }

    #[tokio::test]
    async fn test_create_server_rejects_invalid_ports() {
        // テスト項目: 範囲外・数値以外のポートは 400 と入力値入りのメッセージになる
        for raw in ["1023", "65536", "abc", "70000"] {
            // given (前提条件):
            let router = primary_router(Arc::new(InMemoryRoomRepository::new()));

            // when (操作):
            let uri = format!("/api/create-server?port={raw}");
            let (status, body) = send(router, Method::POST, &uri).await;

            // then (期待する結果):
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body, format!("invalid port number: {raw}"));
        }
    }

    #[tokio::test]
    async fn test_create_server_rejects_registered_port() {
        // テスト項目: 既に登録済みのポートは 400 と重複メッセージになる
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::new());
        repository.insert(create_room("custom-9090", "9090")).await.unwrap();
        let router = primary_router(repository);

        // when (操作):
        let (status, body) = send(router, Method::POST, "/api/create-server?port=9090").await;

        // then (期待する結果):
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "a server is already running on port 9090");
    }

    #[tokio::test]
    async fn test_create_server_reports_the_parsed_port() {
        // テスト項目: 成功時と重複時のメッセージが同じ形式のポート番号を使う
        // given (前提条件):
        let free = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = free.local_addr().unwrap().port();
        drop(free);
        let repository = Arc::new(InMemoryRoomRepository::new());
        let uri = format!("/api/create-server?port=0{port}");

        // when (操作):
        let (created_status, created) =
            send(primary_router(repository.clone()), Method::POST, &uri).await;
        let (duplicate_status, duplicate) =
            send(primary_router(repository), Method::POST, &uri).await;

        // then (期待する結果):
        assert_eq!(created_status, StatusCode::OK);
        assert_eq!(created, format!("Server started on port {port}"));
        assert_eq!(duplicate_status, StatusCode::BAD_REQUEST);
        assert_eq!(
            duplicate,
            format!("a server is already running on port {port}")
        );
    }

    #[tokio::test]
    async fn test_health_and_rooms() {
        // テスト項目: ヘルスチェックとルーム一覧が JSON で返る
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::new());
        repository.insert(create_room("main", "8080")).await.unwrap();

        // when (操作):
        let (health_status, health) =
            send(primary_router(repository.clone()), Method::GET, "/api/health").await;
        let (rooms_status, rooms) =
            send(primary_router(repository.clone()), Method::GET, "/api/rooms").await;
        let (missing_status, _) =
            send(primary_router(repository), Method::GET, "/api/rooms/9999").await;

        // then (期待する結果):
        assert_eq!(health_status, StatusCode::OK);
        assert_eq!(health, r#"{"status":"ok"}"#);
        assert_eq!(rooms_status, StatusCode::OK);
        let rooms: serde_json::Value = serde_json::from_str(&rooms).unwrap();
        assert_eq!(rooms[0]["id"], "main");
        assert_eq!(rooms[0]["clients"], 0);
        assert_eq!(missing_status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_plain_room_has_no_admin_api() {
        // テスト項目: プライマリ以外のルームでは管理 API は静的ファイル扱い（404）になる
        // given (前提条件):
        let router = RoomServer::new(create_room("chat1", "8081"), test_config()).router();

        // when (操作):
        let (status, _) = send(router, Method::POST, "/api/create-server?port=9090").await;

        // then (期待する結果):
        assert_ne!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_ws_without_upgrade_headers_is_rejected() {
        // テスト項目: Upgrade ヘッダの無い /ws へのリクエストはクライアント状態を作らずに拒否される
        // given (前提条件):
        let room = create_room("main", "8080");
        let router = RoomServer::new(room.clone(), test_config()).router();

        // when (操作):
        let (status, _) = send(router, Method::GET, "/ws").await;

        // then (期待する結果):
        assert!(status.is_client_error());
        assert_eq!(room.message_pusher().count_clients().await, 0);
    }

    #[tokio::test]
    async fn test_bind_conflict_is_reported() {
        // テスト項目: 使用中のポートへの bind は LaunchError::Bind になる
        // given (前提条件):
        let occupied = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = occupied.local_addr().unwrap().port();
        let room = create_room("custom", &port.to_string());

        // when (操作):
        let result = RoomServer::new(room, test_config()).bind().await;

        // then (期待する結果):
        assert!(matches!(result, Err(LaunchError::Bind { .. })));
    }
}
