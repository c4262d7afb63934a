//! 수치 안정성과 타일링을 위한 상수값 정의

/// 거리 계산, 타일링, 측지선 관리에 쓰이는 상수들
pub struct Constants;

impl Constants {
    /// 부동소수점 모드에서 log 정의역을 벗어났을 때 돌려주는 값
    pub const LOG_SENTINEL: f64 = -1e20;

    /// 코어 곡선 검사는 기본 엡실론보다 이만큼의 비트를 느슨하게 쓴다
    pub const CORE_CURVE_EPSILON_BITS_OFFSET: u32 = 8;

    /// 공간 해시 격자 크기 (클라인 좌표 기준)
    pub const SPATIAL_HASH_CELL: f64 = 1.0 / 128.0;

    /// 측지선 방향 좌표의 소수부가 경계에서 이 값 이내이면 이웃 대표점도 확인
    pub const CANONICAL_KEY_BOUNDARY: f64 = 0.05;

    /// 같은 측지선 판정 시 점-직선 거리 허용 오차
    pub const SAME_GEODESIC_TOLERANCE: f64 = 1e-6;

    /// 같은 측지선 판정 시 복소 길이 허용 오차
    pub const COMPLEX_LENGTH_TOLERANCE: f64 = 1e-3;

    /// 이보다 짧은 실수 길이의 원소는 록소드로믹으로 보지 않는다
    pub const MIN_GEODESIC_LENGTH: f64 = 1e-6;

    /// 측지선 위 점의 위치를 찾는 면 걷기의 최대 단계 수
    pub const POINT_LOCATION_MAX_STEPS: usize = 10_000;

    /// 셰이더에 넘길 측지선 조각 수의 최솟값
    pub const MIN_GEODESIC_SEGMENTS: usize = 100;

    /// 측지선 유니폼 이름 접두사
    pub const GEODESIC_UNIFORM_PREFIX: &'static str = "geodesics.geodesic";

    /// 길이순 정렬 키의 양자화 배율
    pub const LENGTH_KEY_SCALE: f64 = 1e5;

    /// 허수부가 이보다 크면 양의 회전으로 본다
    pub const LENGTH_KEY_IMAG_EPS: f64 = 1e-5;
}
