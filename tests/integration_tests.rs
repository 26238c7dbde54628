use ma_panel::loaders::{load_month, load_month_pen, load_month_sa, load_range};
use ma_panel::premiums::{mapd_clean_merge, read_ma_premiums, read_mapd_premiums};
use ma_panel::{DataLayout, IngestError, Period};
use std::fs;
use std::path::Path;

const CONTRACT_HEADER: &str = "Contract ID,Plan ID,Organization Type,Plan Type,Offers Part D,SNP Plan,EGHP,Organization Name,Organization Marketing Name,Plan Name,Parent Organization,Contract Effective Date";
const ENROLL_HEADER: &str = "Contract Number,Plan ID,SSA State County Code,FIPS State County Code,State,County,Enrollment";

fn write(path: &Path, lines: &[&str]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, lines.join("\n") + "\n").unwrap();
}

fn jan_2015() -> Period {
    Period::parse("01", 2015).unwrap()
}

#[test]
fn test_load_month_dedups_then_left_joins() {
    let dir = tempfile::tempdir().unwrap();
    let layout = DataLayout::new(dir.path());
    let period = jan_2015();

    write(
        &layout.contract_path(period),
        &[
            CONTRACT_HEADER,
            "H1234,1,Local CCP,HMO,Yes,No,No,Acme Health,Acme,Acme Gold,Acme Inc,01/01/2010",
            "H1234,1,Local CCP,HMO,Yes,No,No,Acme Health,Acme,Acme Gold (dup),Acme Inc,01/01/2010",
        ],
    );
    write(
        &layout.enrollment_path(period),
        &[ENROLL_HEADER, "H1234,1,01000,01001,AL,Autauga,152"],
    );

    let rows = load_month(&layout, period).unwrap();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.plan_name.as_deref(), Some("Acme Gold"));
    assert_eq!(row.county.as_deref(), Some("Autauga"));
    assert_eq!(row.fips, Some(1001.0));
    assert_eq!(row.enrollment, Some(152.0));
    assert_eq!((row.month, row.year), (1, 2015));
}

#[test]
fn test_load_month_row_count_matches_deduped_contracts() {
    let dir = tempfile::tempdir().unwrap();
    let layout = DataLayout::new(dir.path());
    let period = Period::parse("06", 2016).unwrap();

    write(
        &layout.contract_path(period),
        &[
            CONTRACT_HEADER,
            "H1,1,a,b,c,d,e,f,g,h,i,j",
            "H1,2,a,b,c,d,e,f,g,h,i,j",
            "H1,2,a,b,c,d,e,f,g,h,i,j",
            "H2,1,a,b,c,d,e,f,g,h,i,j",
        ],
    );
    write(
        &layout.enrollment_path(period),
        &[ENROLL_HEADER, "H1,2,01000,01001,AL,Autauga,*", "H9,1,01000,01001,AL,Autauga,40"],
    );

    let rows = load_month(&layout, period).unwrap();
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|r| r.month == 6 && r.year == 2016));
    assert_eq!(rows[1].county.as_deref(), Some("Autauga"));
    assert_eq!(rows[1].enrollment, None);
    assert_eq!(rows[2].county, None);
}

#[test]
fn test_missing_enrollment_file_names_exact_path() {
    let dir = tempfile::tempdir().unwrap();
    let layout = DataLayout::new(dir.path());
    let period = jan_2015();

    write(&layout.contract_path(period), &[CONTRACT_HEADER, "H1,1,a,b,c,d,e,f,g,h,i,j"]);

    let err = load_month(&layout, period).unwrap_err();
    match err {
        IngestError::MissingFile { kind, path } => {
            assert_eq!(kind, "enrollment");
            assert_eq!(path, layout.enrollment_path(period));
            assert!(path.ends_with("CPSC_Enrollment_Info_2015_01.csv"));
        }
        other => panic!("expected missing file error, got {other:?}"),
    }
}

#[test]
fn test_missing_contract_file_checked_first() {
    let dir = tempfile::tempdir().unwrap();
    let layout = DataLayout::new(dir.path());

    let err = load_month(&layout, jan_2015()).unwrap_err();
    assert!(err.to_string().starts_with("missing contract file: "));
    assert!(err.to_string().ends_with("CPSC_Contract_Info_2015_01.csv"));
}

#[test]
fn test_service_area_and_penetration_loaders() {
    let dir = tempfile::tempdir().unwrap();
    let layout = DataLayout::new(dir.path());
    let period = Period::parse("12", 2019).unwrap();

    write(
        &layout.service_area_path(period),
        &[
            "Contract ID,Organization Name,Organization Type,Plan Type,Partial,EGHP,SSA,FIPS,County,State,Notes",
            "H1234,Acme,Local CCP,HMO,FALSE,No,01000,01001,Autauga,AL,",
            "H1234,Acme,Local CCP,HMO,maybe,No,01010,01003,Baldwin,AL,",
        ],
    );
    write(
        &layout.penetration_path(period),
        &[
            "State Name,County Name,FIPS State,FIPS Cnty,FIPS,SSA State,SSA Cnty,SSA,Eligibles,Enrolled,Penetration",
            "Alabama,Autauga,01,001,01001,01,000,01000,\"10,512\",\"3,025\",28.78%",
        ],
    );

    let sa = load_month_sa(&layout, period).unwrap();
    assert_eq!(sa.len(), 2);
    assert_eq!(sa[0].partial, Some(false));
    assert_eq!(sa[1].partial, None);
    assert!(sa.iter().all(|r| r.month == 12 && r.year == 2019));

    let pen = load_month_pen(&layout, period).unwrap();
    assert_eq!(pen.len(), 1);
    assert_eq!(pen[0].eligibles, Some(10512.0));
    assert_eq!(pen[0].penetration, Some(28.78));
    assert_eq!((pen[0].month, pen[0].year), (12, 2019));

    let err = load_month_pen(&layout, Period::parse("11", 2019).unwrap()).unwrap_err();
    assert!(err.is_missing_file());
}

#[test]
fn test_load_range_over_partial_coverage() {
    let dir = tempfile::tempdir().unwrap();
    let layout = DataLayout::new(dir.path());

    for m in ["01", "03"] {
        let p = Period::parse(m, 2015).unwrap();
        write(
            &layout.penetration_path(p),
            &["h", "Alabama,Autauga,01,001,01001,01,000,01000,100,10,10%"],
        );
    }

    let periods = Period::range(&[2015], &[1, 2, 3]).unwrap();
    let load = load_range(&periods, |p| load_month_pen(&layout, p)).unwrap();
    assert_eq!(load.rows.len(), 2);
    assert_eq!(load.loaded.len(), 2);
    assert_eq!(load.skipped, vec![Period::new(2015, 2).unwrap()]);
    assert_eq!(load.rows[1].month, 3);
}

#[test]
fn test_premium_files_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let ma_path = dir.path().join("ma_2015.csv");
    let mapd_path = dir.path().join("mapd_2015.csv");

    write(
        &ma_path,
        &[
            "contractid,planid,state,county,premium",
            "H1234,1,AL,Autauga,",
            "H1234,1,AL,Autauga,$30.00",
            "H5555,3,AL,Bibb,$0.00",
        ],
    );
    write(
        &mapd_path,
        &[
            "contractid,planid,state,county,premium_partc,premium_partd_basic,premium_partd_supp,premium_partd_total,partd_deductible",
            "H1234,001,AL,Autauga,$0.00,$20.00,$5.00,$25.00,$0.00",
            "H7777,x1,AL,Autauga,$10.00,,,,",
        ],
    );

    let ma = read_ma_premiums(&ma_path).unwrap();
    let mapd = read_mapd_premiums(&mapd_path).unwrap();
    let merged = mapd_clean_merge(&ma, &mapd, 2015);

    assert_eq!(merged.len(), 3);

    let h1234 = &merged[0];
    assert_eq!(h1234.contractid.as_deref(), Some("H1234"));
    assert_eq!(h1234.premium, Some(30.0));
    assert_eq!(h1234.premium_partd_total, Some(25.0));

    let h5555 = &merged[1];
    assert_eq!(h5555.premium, Some(0.0));
    assert_eq!(h5555.premium_partc, None);

    let h7777 = &merged[2];
    assert_eq!(h7777.planid, None);
    assert_eq!(h7777.premium_partc, Some(10.0));
    assert!(merged.iter().all(|r| r.year == 2015));
}
