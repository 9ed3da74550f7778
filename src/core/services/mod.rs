pub mod movement_service;
pub mod product_service;
pub mod report_service;
pub mod trade_service;

pub use movement_service::MovementService;
pub use product_service::ProductService;
pub use report_service::{
    BalanceBreakdown, DateRange, InventoryStats, MovementLine, MovementTotals, ProductSales,
    ReportService,
};
pub use trade_service::TradeService;
