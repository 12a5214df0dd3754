use super::model::catalog::Catalog;

/// 永続化エラーの分類。Application層はこれでIo/CorruptDataを振り分ける。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    /// 読み書きそのものの失敗（権限、容量不足など）
    Io,
    /// 保存内容が壊れていて読めない
    CorruptData,
}

pub trait StoreError: std::error::Error + Send + Sync + 'static {
    fn kind(&self) -> StoreErrorKind;
}

/// 永続化の抽象。Infra層が実装する。
///
/// ロックは持たない。複数プロセスが同時にsaveすると最後の書き込みが残る。
pub trait CatalogRepository {
    type Error: StoreError;

    /// 保存先が存在しなければ空のCatalogを返す。
    fn load(&self) -> Result<Catalog, Self::Error>;
    /// Catalog全体で既存内容を置き換える。
    fn save(&self, catalog: &Catalog) -> Result<(), Self::Error>;
}

impl<R: CatalogRepository + ?Sized> CatalogRepository for &R {
    type Error = R::Error;

    fn load(&self) -> Result<Catalog, Self::Error> {
        (**self).load()
    }

    fn save(&self, catalog: &Catalog) -> Result<(), Self::Error> {
        (**self).save(catalog)
    }
}
