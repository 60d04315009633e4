//! 패키지 인덱스 -- `(name, version)` 별 레코드 저장소
//!
//! [`PackageIndex`]는 등록 순서를 보존하며, 버전 없는 조회는 항상
//! 가장 먼저 등록된 같은 이름의 패키지로 해결됩니다.

use std::collections::HashMap;

use crate::types::{PackageKey, PackageRecord};

/// 인덱스 내 레코드 위치 (등록 순서)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageId(usize);

impl PackageId {
    /// 등록 순서상의 위치
    pub fn position(self) -> usize {
        self.0
    }
}

/// 등록 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registration {
    /// 레코드 ID
    pub id: PackageId,
    /// 이번 호출로 새로 생성되었는지 여부
    pub inserted: bool,
}

/// 패키지 인덱스
#[derive(Debug, Clone, Default)]
pub struct PackageIndex {
    records: Vec<PackageRecord>,
    by_key: HashMap<PackageKey, PackageId>,
    /// 이름별 최초 등록 레코드
    by_name: HashMap<String, PackageId>,
}

impl PackageIndex {
    /// 빈 인덱스를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// `(name, version)` 레코드를 등록하고 ID를 반환합니다.
    ///
    /// 이미 존재하면 기존 레코드의 ID를 그대로 반환합니다.
    pub fn register(&mut self, name: &str, version: &str) -> PackageId {
        self.register_entry(name, version).id
    }

    /// [`register`](Self::register)와 같지만 새로 생성되었는지 여부도 반환합니다.
    pub fn register_entry(&mut self, name: &str, version: &str) -> Registration {
        let key = PackageKey::new(name, version);
        if let Some(&id) = self.by_key.get(&key) {
            return Registration {
                id,
                inserted: false,
            };
        }

        let id = PackageId(self.records.len());
        self.records.push(PackageRecord::new(name, version));
        self.by_name.entry(key.name.clone()).or_insert(id);
        self.by_key.insert(key, id);

        Registration { id, inserted: true }
    }

    /// 패키지를 조회합니다.
    ///
    /// `version`이 `None`이면 같은 이름 중 가장 먼저 등록된 레코드를 반환합니다.
    pub fn lookup(&self, name: &str, version: Option<&str>) -> Option<PackageId> {
        match version {
            Some(version) => self.by_key.get(&PackageKey::new(name, version)).copied(),
            None => self.by_name.get(name).copied(),
        }
    }

    /// `(name, version)` 레코드 존재 여부
    pub fn contains(&self, key: &PackageKey) -> bool {
        self.by_key.contains_key(key)
    }

    /// ID로 레코드를 가져옵니다.
    pub fn get(&self, id: PackageId) -> Option<&PackageRecord> {
        self.records.get(id.0)
    }

    /// ID로 수정 가능한 레코드를 가져옵니다.
    pub fn get_mut(&mut self, id: PackageId) -> Option<&mut PackageRecord> {
        self.records.get_mut(id.0)
    }

    /// 키로 레코드를 가져옵니다.
    pub fn get_by_key(&self, key: &PackageKey) -> Option<&PackageRecord> {
        self.by_key.get(key).and_then(|&id| self.get(id))
    }

    /// 등록된 레코드 수
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// 비어 있는지 여부
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 등록 순서대로 레코드를 순회합니다.
    pub fn iter(&self) -> impl Iterator<Item = &PackageRecord> {
        self.records.iter()
    }

    /// 등록 순서대로 `(ID, 레코드)`를 순회합니다.
    pub fn entries(&self) -> impl Iterator<Item = (PackageId, &PackageRecord)> {
        self.records
            .iter()
            .enumerate()
            .map(|(pos, record)| (PackageId(pos), record))
    }
}
