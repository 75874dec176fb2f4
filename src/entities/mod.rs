pub mod alert;
pub mod ingredient;
pub mod inventory_count;
pub mod inventory_count_item;
pub mod purchase_order;
pub mod purchase_order_line;
pub mod receiving_checklist_item;
pub mod receiving_record;
pub mod stock_movement;
pub mod storage_center;
pub mod supplier;
