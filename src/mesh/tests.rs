use approx::assert_relative_eq;
use nalgebra::{Point2, Point3, Vector3};

use super::{FaceId, FaceSetQuery, Mesh, MeshChange, VertMapper, VertexId};

/// 2x2 grid of unit quads in the z = 0 plane, counter-clockwise around +z
fn grid() -> (Mesh<f64>, Vec<VertexId>, Vec<FaceId>) {
    let mut mesh = Mesh::new();
    let vs: Vec<_> = (0..9)
        .map(|i| mesh.add_vertex(Point3::new((i % 3) as f64, (i / 3) as f64, 0.)))
        .collect();
    let faces = [(0, 1, 4, 3), (1, 2, 5, 4), (3, 4, 7, 6), (4, 5, 8, 7)]
        .iter()
        .map(|(a, b, c, d)| mesh.add_face(vec![vs[*a], vs[*b], vs[*c], vs[*d]], None).unwrap())
        .collect();
    (mesh, vs, faces)
}

#[test]
fn add_face_rejects_bad_input() {
    let mut mesh = Mesh::<f64>::new();
    let a = mesh.add_vertex(Point3::origin());
    let b = mesh.add_vertex(Point3::new(1., 0., 0.));
    let c = mesh.add_vertex(Point3::new(0., 1., 0.));
    assert!(mesh.add_face(vec![a, b], None).is_err());
    assert!(mesh.add_face(vec![a, b, a], None).is_err());
    assert!(mesh
        .add_face(vec![a, b, c], Some(vec![Point2::origin()]))
        .is_err());
    assert!(mesh.add_face(vec![a, b, c], None).is_ok());
    assert!(mesh.remove_vertex(a).is_none());
}

#[test]
fn boundary_loop_of_grid() {
    let (mesh, vs, faces) = grid();
    let ring = mesh.boundary_loop(&faces).unwrap();
    assert_eq!(ring.len(), 8);
    assert!(!ring.contains(&vs[4]));
    assert_eq!(mesh.interior_vertices(&faces), vec![vs[4]]);
    assert_relative_eq!(mesh.avg_boundary_edge_len(&faces), 1.);
    assert_relative_eq!(mesh.face_set_normal(&faces).unwrap(), Vector3::z());

    // consecutive loop vertices are adjacent
    for i in 0..ring.len() {
        let (a, b) = (ring[i], ring[(i + 1) % ring.len()]);
        assert!(mesh.adjacent_vertices(a).contains(&b));
    }

    // the center is shared by all four quads, a corner by one
    assert_eq!(mesh.faces_of_vertex(vs[4]).len(), 4);
    assert_eq!(mesh.faces_of_vertex(vs[0]), vec![faces[0]]);
}

#[test]
fn single_face_loop_follows_winding() {
    let (mesh, vs, faces) = grid();
    let ring = mesh.boundary_loop(&faces[..1]).unwrap();
    assert_eq!(ring, vec![vs[0], vs[1], vs[4], vs[3]]);
}

#[test]
fn exterior_faces_share_an_edge() {
    let (mesh, _, faces) = grid();
    let mut ext = mesh.exterior_faces(&faces[..1]);
    ext.sort();
    let mut expected = vec![faces[1], faces[2]];
    expected.sort();
    assert_eq!(ext, expected);
    assert!(!mesh.disjoint(&faces[..1], &faces[3..]));
}

#[test]
fn min_uv_delta_defaults_to_one() {
    let (mut mesh, vs, faces) = grid();
    assert_relative_eq!(mesh.min_uv_delta(&faces), 1.);

    let uvs = [
        Point2::new(0., 0.),
        Point2::new(0.25, 0.),
        Point2::new(0.25, 1.),
        Point2::new(0., 1.),
    ];
    let top = mesh.add_vertex(Point3::new(0., 0., 1.));
    let top2 = mesh.add_vertex(Point3::new(1., 0., 1.));
    let f = mesh.add_quad([vs[0], vs[1], top2, top], uvs).unwrap();
    assert_relative_eq!(mesh.min_uv_delta(&[f]), 0.25);
}

#[test]
fn copy_faces_through_mapper() {
    let (mut mesh, vs, faces) = grid();
    let copies: Vec<_> = vs
        .iter()
        .map(|v| {
            let p = mesh.position(*v).unwrap();
            mesh.add_vertex(p + Vector3::z())
        })
        .collect();
    let mapper = VertMapper::from_pairs(&vs, &copies);
    let flipped = mapper.copy_faces(&mut mesh, &faces, true).unwrap();
    assert_eq!(flipped.len(), 4);
    assert_relative_eq!(mesh.face_normal(flipped[0]).unwrap(), -Vector3::z());
    assert_relative_eq!(mesh.face_set_normal(&flipped).unwrap(), -Vector3::z());

    let partial = VertMapper::from_pairs(&vs[..3], &copies[..3]);
    assert!(partial.copy_faces(&mut mesh, &faces, false).is_err());
}

#[test]
fn bowtie_quad_is_not_simple() {
    let mut mesh = Mesh::<f64>::new();
    let p = [(0., 0.), (1., 0.), (0., 1.), (1., 1.)];
    let vs: Vec<_> = p
        .iter()
        .map(|(x, y)| mesh.add_vertex(Point3::new(*x, *y, 0.)))
        .collect();
    let bowtie = mesh.add_face(vs.clone(), None).unwrap();
    let square = mesh
        .add_face(vec![vs[0], vs[1], vs[3], vs[2]], None)
        .unwrap();
    assert!(!mesh.is_simple_quad(bowtie));
    assert!(mesh.is_simple_quad(square));
}

#[test]
fn creases_and_notifications() {
    let (mut mesh, vs, _) = grid();
    mesh.set_crease(vs[1], vs[0], true);
    assert!(mesh.is_crease(vs[0], vs[1]));
    mesh.set_crease(vs[0], vs[1], false);
    assert_eq!(mesh.crease_count(), 0);

    mesh.changed(MeshChange::Triangulation);
    mesh.changed(MeshChange::Triangulation);
    assert_eq!(mesh.change_count(MeshChange::Triangulation), 2);
    assert_eq!(mesh.change_count(MeshChange::Geometry), 0);
}
