/*
 * Responsibility
 * - resource ごとの型付き公開IDを宣言する
 *
 * ここで `pub` にしたものは ./mod.rs から re-export される
 */
use super::core::PublicId;

// orders
pub enum OrderTag {}
pub type PublicOrderId = PublicId<OrderTag>;
